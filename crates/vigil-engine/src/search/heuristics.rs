//! Killer moves and the history heuristic for quiet-move ordering.

use vigil_board::{Move, Piece, Square};

use crate::search::negamax::MAX_PLY;

/// Two killer slots per ply: quiet moves that caused a beta cutoff.
pub struct KillerTable {
    slots: [[Option<Move>; 2]; MAX_PLY],
}

impl KillerTable {
    pub fn new() -> Self {
        Self {
            slots: [[None; 2]; MAX_PLY],
        }
    }

    pub fn clear(&mut self) {
        self.slots = [[None; 2]; MAX_PLY];
    }

    /// Record a cutoff move at `ply`: slot 0 takes the move, slot 1 takes
    /// the previous slot 0.
    pub fn store(&mut self, ply: usize, mv: Move) {
        if let Some(slots) = self.slots.get_mut(ply) {
            slots[1] = slots[0];
            slots[0] = Some(mv);
        }
    }

    /// Which slot holds `mv` at `ply`, preferring slot 0.
    pub fn slot_of(&self, ply: usize, mv: Move) -> Option<usize> {
        let slots = self.slots.get(ply)?;
        slots.iter().position(|killer| *killer == Some(mv))
    }

    pub fn killers(&self, ply: usize) -> [Option<Move>; 2] {
        self.slots.get(ply).copied().unwrap_or([None; 2])
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// History scores indexed by `[piece][to_square]`.
///
/// Quiet moves that raise alpha earn `depth`; the table only grows during a
/// search and is cleared at the start of the next one.
pub struct HistoryTable {
    table: [[i32; 64]; 6],
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            table: [[0; 64]; 6],
        }
    }

    pub fn clear(&mut self) {
        self.table = [[0; 64]; 6];
    }

    pub fn add(&mut self, piece: Piece, to: Square, depth: i32) {
        let entry = &mut self.table[piece as usize][to as usize];
        *entry = entry.saturating_add(depth);
    }

    pub fn score(&self, piece: Piece, to: Square) -> i32 {
        self.table[piece as usize][to as usize]
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}
