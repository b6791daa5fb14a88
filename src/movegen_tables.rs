//! Direction tables for mailbox move generation.
//!
//! All offsets are displacements on the 10x12 padded board (see
//! [`crate::utils::MAILBOX`]): one rank is 10 cells, one file is 1 cell.

use crate::position::PieceType;

pub static KNIGHT_OFFSETS: [i32; 8] = [-21, -19, -12, -8, 8, 12, 19, 21];

pub static BISHOP_DIRECTIONS: [i32; 4] = [-11, -9, 9, 11];

pub static ROOK_DIRECTIONS: [i32; 4] = [-10, -1, 1, 10];

pub static QUEEN_DIRECTIONS: [i32; 8] = [-11, -10, -9, -1, 1, 9, 10, 11];

pub static KING_OFFSETS: [i32; 8] = [-10, -1, 1, 10, -11, -9, 9, 11];

static NO_OFFSETS: [i32; 0] = [];

/// Pawn capture offsets relative to a single push: one file to the west,
/// one to the east.
pub const PAWN_CAPTURE_SHIFTS: [i32; 2] = [-1, 1];

/// Offsets for a piece and whether it slides along them.
pub fn offsets_for(piece_type: PieceType) -> (&'static [i32], bool) {
    match piece_type {
        PieceType::Knight => (KNIGHT_OFFSETS.as_slice(), false),
        PieceType::Bishop => (BISHOP_DIRECTIONS.as_slice(), true),
        PieceType::Rook => (ROOK_DIRECTIONS.as_slice(), true),
        PieceType::Queen => (QUEEN_DIRECTIONS.as_slice(), true),
        PieceType::King => (KING_OFFSETS.as_slice(), false),
        PieceType::Pawn => (NO_OFFSETS.as_slice(), false),
    }
}
