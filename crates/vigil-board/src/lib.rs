//! Board collaborator for the vigil search: positions with make/unmake,
//! scored move generation and static evaluation.
//!
//! Move generation, hashing and FEN handling come from `cozy-chess`; this
//! crate layers the game history, search ply and ordering scores the search
//! needs on top of it.

mod error;
mod eval;
mod movegen;
mod position;

pub use cozy_chess::{Color, Move, Piece, Square};
pub use error::PositionError;
pub use eval::{PIECE_VALUE, evaluate};
pub use movegen::{CAPTURE_BASE, MoveList, ScoredMove, generate_all_caps, generate_all_moves};
pub use position::{Position, STARTING_FEN};
