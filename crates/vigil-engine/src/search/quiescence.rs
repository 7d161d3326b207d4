//! Capture-only search past the nominal depth.

use vigil_board::{Position, evaluate, generate_all_caps};

use crate::search::negamax::{DRAW_SCORE, MAX_PLY, SearchContext, is_draw};
use crate::search::ordering::MovePicker;

/// Resolve pending captures before trusting the static evaluation.
///
/// The side to move may always decline to capture, so the evaluation acts as
/// a floor (stand pat). Fail-hard like the main search; never touches the
/// transposition table.
pub(super) fn quiescence(
    pos: &mut Position,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    debug_assert!(alpha < beta, "alpha {alpha} must be below beta {beta}");

    ctx.control.visit();

    if is_draw(pos) {
        return DRAW_SCORE;
    }
    if pos.ply() > MAX_PLY - 1 {
        return evaluate(pos);
    }

    let stand_pat = evaluate(pos);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut picker = MovePicker::new_captures(generate_all_caps(pos));
    let mut legal = 0u32;

    while let Some(entry) = picker.pick_next() {
        if !pos.make_move(entry.mv) {
            continue;
        }
        legal += 1;
        let score = -quiescence(pos, -beta, -alpha, ctx);
        pos.take_move();

        if ctx.control.is_stopped() {
            return 0;
        }

        if score > alpha {
            if score >= beta {
                ctx.control.record_fail_high(legal == 1);
                return beta;
            }
            alpha = score;
        }
    }

    alpha
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use super::*;
    use crate::search::control::SearchControl;
    use crate::search::heuristics::{HistoryTable, KillerTable};
    use crate::search::negamax::INF;
    use crate::search::tt::TranspositionTable;

    fn run(pos: &mut Position, alpha: i32, beta: i32) -> (i32, u64) {
        let mut tt = TranspositionTable::with_capacity(16);
        let mut killers = KillerTable::new();
        let mut history = HistoryTable::new();
        let mut control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        let score = {
            let mut ctx = SearchContext::new(&mut tt, &mut killers, &mut history, &mut control);
            quiescence(pos, alpha, beta, &mut ctx)
        };
        assert_eq!(tt.stats().new_writes, 0);
        (score, control.stats().nodes)
    }

    #[test]
    fn stand_pat_above_beta_returns_beta() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let (score, nodes) = run(&mut pos, -100, 100);
        assert_eq!(score, 100);
        assert_eq!(nodes, 1);
    }

    #[test]
    fn quiet_position_returns_static_eval() {
        let mut pos = Position::startpos();
        let (score, _) = run(&mut pos, -INF, INF);
        assert_eq!(score, evaluate(&pos));
    }

    #[test]
    fn hanging_queen_is_taken() {
        // White to move wins the undefended queen on d5
        let mut pos = Position::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&pos) < 0);
        let (score, nodes) = run(&mut pos, -INF, INF);
        assert!(score > 0, "capture should win material, got {score}");
        assert!(nodes > 1);
    }

    #[test]
    fn defended_piece_is_not_grabbed() {
        // Qxd5 loses the queen to exd5
        let mut pos = Position::from_fen("4k3/8/4p3/3n4/8/8/8/3QK3 w - - 0 1").unwrap();
        let (score, _) = run(&mut pos, -INF, INF);
        assert_eq!(score, evaluate(&pos));
    }

    #[test]
    fn repetition_scores_zero() {
        let mut pos = Position::from_fen("4k1n1/8/8/8/8/8/8/3QK1N1 w - - 0 1").unwrap();
        for text in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            pos.play_uci(text).unwrap();
        }
        let (score, _) = run(&mut pos, -INF, INF);
        assert_eq!(score, DRAW_SCORE);
    }
}
