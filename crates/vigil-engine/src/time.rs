//! Time management: turn clock parameters into a per-move budget.

use std::time::Duration;

/// Moves assumed left in the game when the clock does not say.
pub const DEFAULT_MOVES_TO_GO: u32 = 30;

/// Kept back from every budget to cover reporting and move transmission.
const SAFETY_MARGIN: Duration = Duration::from_millis(50);

const MIN_BUDGET: Duration = Duration::from_millis(1);

/// Time to spend on the next move.
///
/// Splits `remaining` evenly over `moves_to_go` (default
/// [`DEFAULT_MOVES_TO_GO`]), subtracts a 50 ms safety margin and adds the
/// increment. Never returns less than 1 ms.
pub fn allocate(remaining: Duration, increment: Duration, moves_to_go: Option<u32>) -> Duration {
    let mtg = moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
    let share = remaining / mtg;
    let budget = share.saturating_sub(SAFETY_MARGIN) + increment;
    budget.max(MIN_BUDGET)
}
