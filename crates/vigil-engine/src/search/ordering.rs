//! Move ordering: PV move, captures, killers, then history.

use vigil_board::{Move, MoveList, ScoredMove};

use crate::search::heuristics::{HistoryTable, KillerTable};

/// Score given to the principal-variation move; above everything else.
pub const PV_SCORE: i32 = 2_000_000;

/// Killer scores, below captures (`CAPTURE_BASE`) and above history.
pub const FIRST_KILLER_SCORE: i32 = 900_000;
pub const SECOND_KILLER_SCORE: i32 = 800_000;

/// Incremental move picker using selection.
///
/// Each call to [`pick_next`](Self::pick_next) moves the best remaining move
/// to the front of the unsearched part. Equal scores come out in generation
/// order.
pub struct MovePicker {
    moves: MoveList,
    cursor: usize,
}

impl MovePicker {
    /// Picker for the main search.
    ///
    /// Quiet moves are scored from the killer and history tables; captures
    /// keep the generator's MVV-LVA score. `pv_move`, when present in the
    /// list, is raised to [`PV_SCORE`].
    pub fn new(
        mut moves: MoveList,
        pv_move: Option<Move>,
        killers: &KillerTable,
        history: &HistoryTable,
        ply: usize,
    ) -> Self {
        for entry in moves.as_mut_slice() {
            if entry.is_capture() {
                continue;
            }
            entry.score = match killers.slot_of(ply, entry.mv) {
                Some(0) => FIRST_KILLER_SCORE,
                Some(_) => SECOND_KILLER_SCORE,
                None => history.score(entry.piece, entry.mv.to),
            };
        }

        if let Some(pv) = pv_move {
            if let Some(entry) = moves.as_mut_slice().iter_mut().find(|entry| entry.mv == pv) {
                entry.score = PV_SCORE;
            }
        }

        Self { moves, cursor: 0 }
    }

    /// Picker for quiescence: generator scores only.
    pub fn new_captures(moves: MoveList) -> Self {
        Self { moves, cursor: 0 }
    }

    /// Yield the next highest-scored move, or `None` when exhausted.
    pub fn pick_next(&mut self) -> Option<ScoredMove> {
        let remaining = &mut self.moves.as_mut_slice()[self.cursor..];
        if remaining.is_empty() {
            return None;
        }

        let mut best = 0;
        for (i, entry) in remaining.iter().enumerate().skip(1) {
            if entry.score > remaining[best].score {
                best = i;
            }
        }

        // Rotate rather than swap so the skipped moves keep their order
        remaining[..=best].rotate_right(1);
        self.cursor += 1;
        Some(remaining[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_board::{Position, generate_all_caps, generate_all_moves};

    fn mv(text: &str) -> Move {
        text.parse().unwrap()
    }

    fn drain(mut picker: MovePicker) -> Vec<ScoredMove> {
        let mut out = Vec::new();
        while let Some(entry) = picker.pick_next() {
            out.push(entry);
        }
        out
    }

    #[test]
    fn equal_scores_keep_generation_order() {
        let pos = Position::startpos();
        let generated: Vec<Move> = generate_all_moves(&pos).iter().map(|e| e.mv).collect();
        let picked: Vec<Move> = drain(MovePicker::new(
            generate_all_moves(&pos),
            None,
            &KillerTable::new(),
            &HistoryTable::new(),
            0,
        ))
        .iter()
        .map(|e| e.mv)
        .collect();
        assert_eq!(picked, generated);
    }

    #[test]
    fn pv_move_comes_first() {
        let pos = Position::startpos();
        let picked = drain(MovePicker::new(
            generate_all_moves(&pos),
            Some(mv("b1c3")),
            &KillerTable::new(),
            &HistoryTable::new(),
            0,
        ));
        assert_eq!(picked.len(), 20);
        assert_eq!(picked[0].mv, mv("b1c3"));
        assert_eq!(picked[0].score, PV_SCORE);
    }

    #[test]
    fn pv_move_absent_from_list_is_ignored() {
        let pos = Position::startpos();
        let picked = drain(MovePicker::new(
            generate_all_moves(&pos),
            Some(mv("e2e5")),
            &KillerTable::new(),
            &HistoryTable::new(),
            0,
        ));
        assert!(picked.iter().all(|entry| entry.score != PV_SCORE));
    }

    #[test]
    fn captures_then_killers_then_history() {
        // Rxd5 is the only capture
        let pos = Position::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1").unwrap();
        let mut killers = KillerTable::new();
        killers.store(2, mv("e1f1"));
        killers.store(2, mv("d2a2"));
        let mut history = HistoryTable::new();
        history.add(vigil_board::Piece::Rook, vigil_board::Square::H2, 10);

        let picked = drain(MovePicker::new(
            generate_all_moves(&pos),
            None,
            &killers,
            &history,
            2,
        ));
        assert_eq!(picked[0].mv, mv("d2d5"));
        assert_eq!(picked[1].mv, mv("d2a2"));
        assert_eq!(picked[1].score, FIRST_KILLER_SCORE);
        assert_eq!(picked[2].mv, mv("e1f1"));
        assert_eq!(picked[2].score, SECOND_KILLER_SCORE);
        assert_eq!(picked[3].mv, mv("d2h2"));
        assert_eq!(picked[3].score, 10);
        assert!(picked[4..].iter().all(|entry| entry.score == 0));
    }

    #[test]
    fn killers_only_apply_at_their_ply() {
        let pos = Position::startpos();
        let mut killers = KillerTable::new();
        killers.store(1, mv("g1f3"));
        let picked = drain(MovePicker::new(
            generate_all_moves(&pos),
            None,
            &killers,
            &HistoryTable::new(),
            0,
        ));
        assert!(picked.iter().all(|entry| entry.score == 0));
    }

    #[test]
    fn capture_picker_orders_by_victim() {
        // Pawn on e4 can take a knight on d5 or a queen on f5
        let pos = Position::from_fen("4k3/8/8/3n1q2/4P3/8/8/4K3 w - - 0 1").unwrap();
        let picked = drain(MovePicker::new_captures(generate_all_caps(&pos)));
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].mv, mv("e4f5"));
        assert_eq!(picked[1].mv, mv("e4d5"));
    }

    #[test]
    fn empty_list_yields_nothing() {
        let pos = Position::startpos();
        let mut picker = MovePicker::new_captures(generate_all_caps(&pos));
        assert!(picker.pick_next().is_none());
    }
}
