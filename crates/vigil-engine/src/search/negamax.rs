//! Negamax alpha-beta search.

use vigil_board::{Move, Position, evaluate, generate_all_moves};

use crate::search::control::SearchControl;
use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::ordering::MovePicker;
use crate::search::quiescence::quiescence;
use crate::search::tt::{Bound, TranspositionTable};

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = 30_000;

/// Score for delivering checkmate at the root; reduced by one per ply.
pub const MATE_SCORE: i32 = 29_000;

/// Maximum search ply, for table sizing and the recursion guard.
pub const MAX_PLY: usize = 64;

/// Scores beyond this magnitude are forced mates.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;

pub const DRAW_SCORE: i32 = 0;

/// Half-moves without a capture or pawn move that make a draw.
pub const FIFTY_MOVE_LIMIT: u32 = 100;

/// Depth reduction of the null-move search.
const NULL_MOVE_REDUCTION: i32 = 4;

/// Minimum remaining depth for trying a null move.
const NULL_MOVE_MIN_DEPTH: i32 = 4;

/// Scratch state threaded through every node of one search.
pub(super) struct SearchContext<'a> {
    pub tt: &'a mut TranspositionTable,
    pub killers: &'a mut KillerTable,
    pub history: &'a mut HistoryTable,
    pub control: &'a mut SearchControl,
    /// Move that last raised alpha at the root.
    pub root_best: Option<Move>,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        tt: &'a mut TranspositionTable,
        killers: &'a mut KillerTable,
        history: &'a mut HistoryTable,
        control: &'a mut SearchControl,
    ) -> Self {
        Self {
            tt,
            killers,
            history,
            control,
            root_best: None,
        }
    }
}

/// Draw by repetition or the fifty-move rule.
pub(super) fn is_draw(pos: &Position) -> bool {
    pos.is_repetition() || pos.fifty_move() >= FIFTY_MOVE_LIMIT
}

/// Fail-hard negamax search of `pos` to `depth`.
///
/// Returns `beta` on a fail-high and `alpha` on a fail-low; anything in
/// between is exact. Returns 0 once the stop flag is raised; the caller must
/// discard that value.
pub(super) fn alpha_beta(
    pos: &mut Position,
    mut alpha: i32,
    beta: i32,
    mut depth: i32,
    ctx: &mut SearchContext<'_>,
    allow_null: bool,
) -> i32 {
    debug_assert!(alpha < beta, "alpha {alpha} must be below beta {beta}");

    if depth <= 0 {
        return quiescence(pos, alpha, beta, ctx);
    }

    ctx.control.visit();

    let ply = pos.ply();
    if ply > 0 && is_draw(pos) {
        return DRAW_SCORE;
    }
    if ply > MAX_PLY - 1 {
        return evaluate(pos);
    }

    let in_check = pos.in_check();
    if in_check {
        depth += 1;
    }

    let key = pos.key();
    let probe = ctx.tt.probe(key, depth, alpha, beta, ply);
    if let Some(score) = probe.score {
        ctx.tt.record_cut();
        return score;
    }

    if allow_null
        && !in_check
        && ply > 0
        && pos.big_pieces(pos.side_to_move()) > 0
        && depth >= NULL_MOVE_MIN_DEPTH
        && pos.make_null_move()
    {
        let score = -alpha_beta(
            pos,
            -beta,
            -beta + 1,
            depth - NULL_MOVE_REDUCTION,
            ctx,
            false,
        );
        pos.take_null_move();
        if ctx.control.is_stopped() {
            return 0;
        }
        // A mate found with a passed turn proves nothing
        if score >= beta && score.abs() < MATE_THRESHOLD {
            ctx.control.record_null_cut();
            return beta;
        }
    }

    let mut picker = MovePicker::new(
        generate_all_moves(pos),
        probe.best_move,
        &*ctx.killers,
        &*ctx.history,
        ply,
    );

    let old_alpha = alpha;
    let mut legal = 0u32;
    let mut best_score = -INF;
    let mut best_move = None;

    while let Some(entry) = picker.pick_next() {
        if !pos.make_move(entry.mv) {
            continue;
        }
        legal += 1;
        let score = -alpha_beta(pos, -beta, -alpha, depth - 1, ctx, true);
        pos.take_move();

        if ctx.control.is_stopped() {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = Some(entry.mv);
            if score > alpha {
                if score >= beta {
                    ctx.control.record_fail_high(legal == 1);
                    if !entry.is_capture() {
                        ctx.killers.store(ply, entry.mv);
                    }
                    ctx.tt
                        .store(key, Some(entry.mv), beta, Bound::LowerBound, depth, ply);
                    return beta;
                }
                alpha = score;
                if ply == 0 {
                    ctx.root_best = Some(entry.mv);
                }
                if !entry.is_capture() {
                    ctx.history.add(entry.piece, entry.mv.to, depth);
                }
            }
        }
    }

    if legal == 0 {
        return if in_check {
            -MATE_SCORE + ply as i32
        } else {
            DRAW_SCORE
        };
    }

    if alpha != old_alpha {
        ctx.tt.store(key, best_move, best_score, Bound::Exact, depth, ply);
    } else {
        ctx.tt.store(key, best_move, alpha, Bound::UpperBound, depth, ply);
    }
    alpha
}
