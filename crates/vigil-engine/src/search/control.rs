//! Search control: stop flag, deadline, interrupt probe and node statistics.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::EngineError;
use crate::report::SearchMode;
use crate::search::negamax::MAX_PLY;
use crate::time;

/// Nodes between two polls of the clock and the interrupt probe.
const POLL_INTERVAL: u64 = 2048;

/// Remaining clock time for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub remaining: Duration,
    pub increment: Duration,
    pub moves_to_go: Option<u32>,
}

/// What the caller asked for; turned into a [`SearchControl`] by
/// [`SearchControl::from_limits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchLimits {
    /// Deepest iteration to run. Defaults to [`MAX_PLY`].
    pub depth: Option<u8>,
    /// Fixed time for this move; takes precedence over `clock`.
    pub movetime: Option<Duration>,
    pub clock: Option<Clock>,
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    pub nodes: u64,
    /// Beta cutoffs.
    pub fail_high: u64,
    /// Beta cutoffs produced by the first legal move.
    pub fail_high_first: u64,
    /// Null-move searches that proved a fail-high.
    pub null_cuts: u64,
}

impl SearchStats {
    /// Fraction of cutoffs found on the first move, a measure of ordering quality.
    pub fn ordering(&self) -> f64 {
        if self.fail_high == 0 {
            0.0
        } else {
            self.fail_high_first as f64 / self.fail_high as f64
        }
    }
}

type InputProbe = Box<dyn FnMut() -> bool + Send>;

/// Controls when a search should stop, and counts what it did.
///
/// Threaded by mutable reference through every node. The clock and the
/// interrupt probe are consulted every [`POLL_INTERVAL`] nodes; either one
/// raises the stop flag. The flag is shared so another thread may raise it
/// too. Once raised it stays raised until the next search clears it.
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    budget: Option<Duration>,
    deadline: Option<Instant>,
    max_depth: u8,
    mode: SearchMode,
    input: Option<InputProbe>,
    stats: SearchStats,
}

impl SearchControl {
    /// No time limit; stops only on the flag or the interrupt probe.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            budget: None,
            deadline: None,
            max_depth: MAX_PLY as u8,
            mode: SearchMode::default(),
            input: None,
            stats: SearchStats::default(),
        }
    }

    /// Stop once `budget` has elapsed. The clock restarts when a search
    /// begins.
    pub fn new_timed(stopped: Arc<AtomicBool>, budget: Duration) -> Self {
        let mut control = Self::new_infinite(stopped);
        control.budget = Some(budget);
        control.deadline = Some(control.start + budget);
        control
    }

    /// Validate `limits` and build the matching control.
    pub fn from_limits(
        stopped: Arc<AtomicBool>,
        limits: &SearchLimits,
    ) -> Result<Self, EngineError> {
        let budget = match (limits.movetime, limits.clock) {
            (Some(movetime), _) => Some(movetime),
            (None, Some(clock)) => Some(time::allocate(
                clock.remaining,
                clock.increment,
                clock.moves_to_go,
            )),
            (None, None) => None,
        };

        let control = match budget {
            Some(budget) => Self::new_timed(stopped, budget),
            None => Self::new_infinite(stopped),
        };
        match limits.depth {
            Some(depth) => control.with_depth(depth),
            None => Ok(control),
        }
    }

    /// Cap the iterative deepening at `depth`.
    pub fn with_depth(mut self, depth: u8) -> Result<Self, EngineError> {
        if depth == 0 || depth as usize > MAX_PLY {
            return Err(EngineError::InvalidDepth {
                depth,
                max: MAX_PLY,
            });
        }
        self.max_depth = depth;
        Ok(self)
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Install a probe reporting pending external input; a `true` answer
    /// interrupts the search at the next poll.
    pub fn with_input_probe<F>(mut self, probe: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.input = Some(Box::new(probe));
        self
    }

    /// Reset the counters, restart the clock and lower the stop flag for a
    /// new search.
    pub(crate) fn clear(&mut self) {
        self.stopped.store(false, Ordering::Relaxed);
        self.stats = SearchStats::default();
        self.start = Instant::now();
        self.deadline = self.budget.map(|budget| self.start + budget);
    }

    /// Count a node, polling the clock and input first on every
    /// [`POLL_INTERVAL`]th call.
    pub(crate) fn visit(&mut self) {
        if self.stats.nodes % POLL_INTERVAL == 0 {
            self.poll();
        }
        self.stats.nodes += 1;
    }

    /// Check the deadline and the interrupt probe now.
    pub fn poll(&mut self) {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                debug!(nodes = self.stats.nodes, "search deadline reached");
                self.stop();
            }
        }
        if let Some(input) = self.input.as_mut() {
            if input() {
                debug!(nodes = self.stats.nodes, "search interrupted by input");
                self.stop();
            }
        }
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Reference to the shared stop flag.
    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stopped
    }

    pub(crate) fn record_fail_high(&mut self, first_move: bool) {
        self.stats.fail_high += 1;
        if first_move {
            self.stats.fail_high_first += 1;
        }
    }

    pub(crate) fn record_null_cut(&mut self) {
        self.stats.null_cuts += 1;
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Time since the current search started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl std::fmt::Debug for SearchControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchControl")
            .field("stopped", &self.is_stopped())
            .field("budget", &self.budget)
            .field("deadline", &self.deadline)
            .field("max_depth", &self.max_depth)
            .field("mode", &self.mode)
            .field("has_input_probe", &self.input.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}
