//! Static evaluation: material plus piece-square tables.
//!
//! Tables are written from White's point of view in LERF order (index 0 = A1,
//! index 63 = H8). Black squares are mirrored with [`Square::flip_rank`].

use cozy_chess::{Color, Piece, Square};

use crate::position::Position;

/// Material values indexed by `Piece as usize`.
pub const PIECE_VALUE: [i32; 6] = [100, 320, 330, 500, 900, 0];

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    10,  10,   0, -10, -10,   0,  10,  10,
     5,   0,   0,   5,   5,   0,   0,   5,
     0,   0,  10,  20,  20,  10,   0,   0,
     5,   5,   5,  10,  10,   5,   5,   5,
    10,  10,  10,  20,  20,  10,  10,  10,
    20,  20,  20,  30,  30,  20,  20,  20,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
     0, -10,   0,   0,   0,   0, -10,   0,
     0,   0,   0,   5,   5,   0,   0,   0,
     0,   0,  10,  10,  10,  10,   0,   0,
     0,   0,  10,  20,  20,  10,   5,   0,
     5,  10,  15,  20,  20,  15,  10,   5,
     5,  10,  10,  20,  20,  10,  10,   5,
     0,   0,   5,  10,  10,   5,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
     0,   0, -10,   0,   0, -10,   0,   0,
     0,   0,   0,  10,  10,   0,   0,   0,
     0,   0,  10,  15,  15,  10,   0,   0,
     0,  10,  15,  20,  20,  15,  10,   0,
     0,  10,  15,  20,  20,  15,  10,   0,
     0,   0,  10,  15,  15,  10,   0,   0,
     0,   0,   0,  10,  10,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     0,   0,   5,  10,  10,   5,   0,   0,
     0,   0,   5,  10,  10,   5,   0,   0,
     0,   0,   5,  10,  10,   5,   0,   0,
     0,   0,   5,  10,  10,   5,   0,   0,
     0,   0,   5,  10,  10,   5,   0,   0,
     0,   0,   5,  10,  10,   5,   0,   0,
    25,  25,  25,  25,  25,  25,  25,  25,
     0,   0,   5,  10,  10,   5,   0,   0,
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
     0,   5,   5, -10, -10,   0,  10,   5,
   -30, -30, -30, -30, -30, -30, -30, -30,
   -50, -50, -50, -50, -50, -50, -50, -50,
   -70, -70, -70, -70, -70, -70, -70, -70,
   -70, -70, -70, -70, -70, -70, -70, -70,
   -70, -70, -70, -70, -70, -70, -70, -70,
   -70, -70, -70, -70, -70, -70, -70, -70,
   -70, -70, -70, -70, -70, -70, -70, -70,
];

fn pst(piece: Piece, sq: Square) -> i32 {
    let index = sq as usize;
    match piece {
        Piece::Pawn => PAWN_PST[index],
        Piece::Knight => KNIGHT_PST[index],
        Piece::Bishop => BISHOP_PST[index],
        Piece::Rook => ROOK_PST[index],
        Piece::Queen => 0,
        Piece::King => KING_PST[index],
    }
}

/// Score of one side's pieces from that side's own point of view.
fn side_score(pos: &Position, color: Color) -> i32 {
    let board = pos.board();
    let ours = board.colors(color);
    let mut score = 0;

    for piece in Piece::ALL {
        for sq in board.pieces(piece) & ours {
            let relative = match color {
                Color::White => sq,
                Color::Black => sq.flip_rank(),
            };
            score += PIECE_VALUE[piece as usize] + pst(piece, relative);
        }
    }
    score
}

/// Evaluate `pos` in centipawns from the side to move's perspective.
pub fn evaluate(pos: &Position) -> i32 {
    let white = side_score(pos, Color::White) - side_score(pos, Color::Black);
    match pos.side_to_move() {
        Color::White => white,
        Color::Black => -white,
    }
}
