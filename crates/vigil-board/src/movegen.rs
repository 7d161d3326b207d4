//! Legal move lists carrying a generator-assigned ordering score.
//!
//! Captures are scored here with MVV-LVA on top of [`CAPTURE_BASE`]; quiet
//! moves start at zero and are scored by the search's move orderer.

use std::ops::Index;

use cozy_chess::{Move, Piece};

use crate::position::Position;

/// Score floor for captures, above killers and history.
pub const CAPTURE_BASE: i32 = 1_000_000;

/// Victim weights indexed by `Piece as usize`.
const VICTIM_SCORE: [i32; 6] = [100, 200, 300, 400, 500, 600];

/// Most valuable victim first, least valuable attacker as tie-break.
fn mvv_lva(victim: Piece, attacker: Piece) -> i32 {
    VICTIM_SCORE[victim as usize] + 6 - VICTIM_SCORE[attacker as usize] / 100
}

/// A move with the context the orderer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    /// Piece being moved.
    pub piece: Piece,
    /// Captured piece, `Pawn` for en passant.
    pub capture: Option<Piece>,
    pub score: i32,
}

impl ScoredMove {
    pub fn is_capture(&self) -> bool {
        self.capture.is_some()
    }
}

/// Moves generated for one node, in generation order.
#[derive(Debug, Clone, Default)]
pub struct MoveList {
    moves: Vec<ScoredMove>,
}

impl MoveList {
    pub fn new() -> Self {
        Self {
            moves: Vec::with_capacity(64),
        }
    }

    pub fn push(&mut self, entry: ScoredMove) {
        self.moves.push(entry);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredMove> {
        self.moves.iter()
    }

    pub fn as_slice(&self) -> &[ScoredMove] {
        &self.moves
    }

    pub fn as_mut_slice(&mut self) -> &mut [ScoredMove] {
        &mut self.moves
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.moves.iter().any(|entry| entry.mv == mv)
    }
}

impl Index<usize> for MoveList {
    type Output = ScoredMove;

    fn index(&self, index: usize) -> &ScoredMove {
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a ScoredMove;
    type IntoIter = std::slice::Iter<'a, ScoredMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

/// All legal moves of the side to move.
pub fn generate_all_moves(pos: &Position) -> MoveList {
    generate(pos, false)
}

/// Legal captures only (including en passant).
pub fn generate_all_caps(pos: &Position) -> MoveList {
    generate(pos, true)
}

fn generate(pos: &Position, captures_only: bool) -> MoveList {
    let board = pos.board();
    // Castling is encoded as king-takes-own-rook, so only enemy-occupied
    // destinations count as captures.
    let theirs = board.colors(!board.side_to_move());
    let mut list = MoveList::new();

    board.generate_moves(|moves| {
        let piece = moves.piece;
        for mv in moves {
            let capture = if theirs.has(mv.to) {
                board.piece_on(mv.to)
            } else if piece == Piece::Pawn && mv.from.file() != mv.to.file() {
                Some(Piece::Pawn)
            } else {
                None
            };

            match capture {
                Some(victim) => list.push(ScoredMove {
                    mv,
                    piece,
                    capture,
                    score: CAPTURE_BASE + mvv_lva(victim, piece),
                }),
                None if !captures_only => list.push(ScoredMove {
                    mv,
                    piece,
                    capture: None,
                    score: 0,
                }),
                None => {}
            }
        }
        false
    });

    list
}
