//! Make/unmake position with the game history used for draw detection.

use cozy_chess::{
    Board, Color, File, Move, Piece, Square, get_bishop_moves, get_king_moves, get_knight_moves,
    get_pawn_attacks, get_rook_moves,
};
use tracing::trace;

use crate::error::PositionError;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A board plus everything needed to take moves back and detect repetitions.
///
/// Every successful [`make_move`](Self::make_move) or
/// [`make_null_move`](Self::make_null_move) pushes the previous board and its
/// key, and advances the search ply. [`take_move`](Self::take_move) restores
/// the previous board exactly.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    undo: Vec<Board>,
    /// Keys of every prior position, oldest first.
    keys: Vec<u64>,
    ply: usize,
}

impl Position {
    /// The standard starting position.
    pub fn startpos() -> Self {
        Self::from_board(Board::default())
    }

    /// Parse a position from FEN.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let board = Board::from_fen(fen.trim(), false).map_err(|err| PositionError::InvalidFen {
            fen: fen.to_string(),
            reason: format!("{err:?}"),
        })?;
        Ok(Self::from_board(board))
    }

    fn from_board(board: Board) -> Self {
        Self {
            board,
            undo: Vec::new(),
            keys: Vec::new(),
            ply: 0,
        }
    }

    /// The underlying board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Zobrist key of the current position.
    pub fn key(&self) -> u64 {
        self.board.hash()
    }

    /// Half-moves made since the search root.
    pub fn ply(&self) -> usize {
        self.ply
    }

    /// Make the current position the search root (ply 0).
    ///
    /// The game history is kept so repetitions of earlier game positions are
    /// still detected.
    pub fn reset_ply(&mut self) {
        self.ply = 0;
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.board.king(color)
    }

    /// Piece standing on `sq`, if any.
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board.piece_on(sq)
    }

    /// Number of non-pawn, non-king pieces owned by `color`.
    pub fn big_pieces(&self, color: Color) -> u32 {
        let small = self.board.pieces(Piece::Pawn) | self.board.pieces(Piece::King);
        (self.board.colors(color) & !small).len()
    }

    /// Half-moves since the last capture or pawn move.
    pub fn fifty_move(&self) -> u32 {
        u32::from(self.board.halfmove_clock())
    }

    /// Keys of all prior positions, oldest first.
    pub fn history(&self) -> &[u64] {
        &self.keys
    }

    /// Whether the current key already occurred since the last irreversible move.
    ///
    /// The position one ply back is skipped: it has the other side to move and
    /// can never match.
    pub fn is_repetition(&self) -> bool {
        let key = self.key();
        let len = self.keys.len();
        let start = len.saturating_sub(self.fifty_move() as usize);
        let end = len.saturating_sub(1);
        start < end && self.keys[start..end].contains(&key)
    }

    /// Whether any piece of `by` attacks `sq`.
    pub fn square_attacked(&self, sq: Square, by: Color) -> bool {
        let board = &self.board;
        let occupied = board.occupied();
        let theirs = board.colors(by);
        let queens = board.pieces(Piece::Queen);

        let pawns = board.pieces(Piece::Pawn) & theirs;
        let knights = board.pieces(Piece::Knight) & theirs;
        let kings = board.pieces(Piece::King) & theirs;
        let diagonal = (board.pieces(Piece::Bishop) | queens) & theirs;
        let orthogonal = (board.pieces(Piece::Rook) | queens) & theirs;

        !(get_pawn_attacks(sq, !by) & pawns).is_empty()
            || !(get_knight_moves(sq) & knights).is_empty()
            || !(get_king_moves(sq) & kings).is_empty()
            || !(get_bishop_moves(sq, occupied) & diagonal).is_empty()
            || !(get_rook_moves(sq, occupied) & orthogonal).is_empty()
    }

    /// Whether the side to move is in check.
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move();
        self.square_attacked(self.king_square(us), !us)
    }

    /// Whether `mv` is a legal move here. Safe to call with moves read back
    /// from a hash table that may belong to another position.
    pub fn move_exists(&self, mv: Move) -> bool {
        self.board.is_legal(mv)
    }

    /// Play `mv`. Returns `false` and leaves the position untouched if the
    /// move would leave the mover's king in check (or is otherwise illegal).
    pub fn make_move(&mut self, mv: Move) -> bool {
        if !self.board.is_legal(mv) {
            return false;
        }
        let mut next = self.board.clone();
        next.play_unchecked(mv);
        self.push(next);
        true
    }

    /// Undo the last move made with [`make_move`](Self::make_move).
    pub fn take_move(&mut self) {
        self.pop();
    }

    /// Pass the turn. Fails (returning `false`) when the side to move is in check.
    ///
    /// The pass counts as a reversible half-move: the fifty-move counter
    /// goes up by one, so inside a null subtree the repetition window and the
    /// fifty-move test reach one ply further back than after a real move.
    pub fn make_null_move(&mut self) -> bool {
        match self.board.null_move() {
            Some(next) => {
                self.push(next);
                true
            }
            None => false,
        }
    }

    /// Undo the last null move.
    pub fn take_null_move(&mut self) {
        self.pop();
    }

    fn push(&mut self, next: Board) {
        self.keys.push(self.board.hash());
        self.undo.push(std::mem::replace(&mut self.board, next));
        self.ply += 1;
    }

    fn pop(&mut self) {
        debug_assert!(!self.undo.is_empty(), "take with an empty undo stack");
        if let Some(previous) = self.undo.pop() {
            self.board = previous;
            self.keys.pop();
            self.ply = self.ply.saturating_sub(1);
        }
    }

    /// Parse coordinate notation against this position.
    ///
    /// Standard castling notation (`e1g1`) is translated to the
    /// king-takes-rook form the board expects.
    pub fn parse_move(&self, text: &str) -> Result<Move, PositionError> {
        let mut mv: Move = text.trim().parse().map_err(|_| PositionError::InvalidMove {
            text: text.to_string(),
        })?;

        if self.board.piece_on(mv.from) == Some(Piece::King)
            && self.board.color_on(mv.to).is_none()
            && mv.from.rank() == mv.to.rank()
        {
            let step = mv.to.file() as i32 - mv.from.file() as i32;
            if step.abs() == 2 {
                let rook_file = if step > 0 { File::H } else { File::A };
                mv.to = Square::new(rook_file, mv.from.rank());
            }
        }
        Ok(mv)
    }

    /// `mv` as it is written in coordinate notation, castling as the king's
    /// two-square step (`e1g1`). Inverse of [`parse_move`](Self::parse_move);
    /// the result is for display and is not playable on the board.
    pub fn display_move(&self, mv: Move) -> Move {
        let us = self.side_to_move();
        if self.board.piece_on(mv.from) == Some(Piece::King)
            && self.board.color_on(mv.to) == Some(us)
        {
            let file = if mv.to.file() as i32 > mv.from.file() as i32 {
                File::G
            } else {
                File::C
            };
            return Move {
                from: mv.from,
                to: Square::new(file, mv.from.rank()),
                promotion: None,
            };
        }
        mv
    }

    /// Apply a game move given in coordinate notation.
    pub fn play_uci(&mut self, text: &str) -> Result<Move, PositionError> {
        let mv = self.parse_move(text)?;
        if !self.make_move(mv) {
            return Err(PositionError::IllegalMove {
                text: text.to_string(),
            });
        }
        trace!(%mv, key = self.key(), "applied game move");
        Ok(mv)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
