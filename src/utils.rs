//! Board geometry and string helpers.
//!
//! Tiles are numbered 0..64 in reading order: tile 0 is a8, tile 7 is h8,
//! tile 56 is a1 and tile 63 is h1. Move generation walks a 10x12 padded
//! "mailbox" so that stepping off the edge of the board lands on a sentinel
//! instead of wrapping onto the next rank.

use crate::error::{ChessError, ChessResult};

/// Index of a tile on the 8x8 board (0 = a8, 63 = h1)
pub type Square = usize;

pub const NUM_TILES: usize = 64;
pub const TILES_PER_ROW: usize = 8;

/// Sentinel stored in [`MAILBOX`] for padded cells that are off the board
const OFF_BOARD: i8 = -1;

/// Padded 10x12 board: maps a padded index to a tile, or -1 when off board.
#[rustfmt::skip]
pub const MAILBOX: [i8; 120] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1,  0,  1,  2,  3,  4,  5,  6,  7, -1,
    -1,  8,  9, 10, 11, 12, 13, 14, 15, -1,
    -1, 16, 17, 18, 19, 20, 21, 22, 23, -1,
    -1, 24, 25, 26, 27, 28, 29, 30, 31, -1,
    -1, 32, 33, 34, 35, 36, 37, 38, 39, -1,
    -1, 40, 41, 42, 43, 44, 45, 46, 47, -1,
    -1, 48, 49, 50, 51, 52, 53, 54, 55, -1,
    -1, 56, 57, 58, 59, 60, 61, 62, 63, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
];

/// Maps a tile to its index in the padded board.
#[rustfmt::skip]
pub const BOARD64: [i32; 64] = [
    21, 22, 23, 24, 25, 26, 27, 28,
    31, 32, 33, 34, 35, 36, 37, 38,
    41, 42, 43, 44, 45, 46, 47, 48,
    51, 52, 53, 54, 55, 56, 57, 58,
    61, 62, 63, 64, 65, 66, 67, 68,
    71, 72, 73, 74, 75, 76, 77, 78,
    81, 82, 83, 84, 85, 86, 87, 88,
    91, 92, 93, 94, 95, 96, 97, 98,
];

static FILE_NAMES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// Steps from `tile` by a padded-board offset.
///
/// # Arguments
///
/// * `tile` - The starting tile (0-63)
/// * `offset` - A displacement on the 10x12 padded board
///
/// # Returns
///
/// * `Some(tile)` when the destination is on the board, `None` otherwise
pub fn step(tile: Square, offset: i32) -> Option<Square> {
    let padded = BOARD64[tile] + offset;
    if !(0..120).contains(&padded) {
        return None;
    }
    match MAILBOX[padded as usize] {
        OFF_BOARD => None,
        target => Some(target as Square),
    }
}

/// Row of a tile counted from the top (row 0 holds rank 8).
pub fn row_of(tile: Square) -> usize {
    tile / TILES_PER_ROW
}

/// File of a tile (0 = a-file).
pub fn file_of(tile: Square) -> usize {
    tile % TILES_PER_ROW
}

pub fn file_name(tile: Square) -> char {
    FILE_NAMES[file_of(tile)]
}

/// Converts a tile index into algebraic square notation such as `e4`.
pub fn square_name(tile: Square) -> String {
    format!("{}{}", file_name(tile), 8 - row_of(tile))
}

/// Parses a square name such as `e4` into a tile index.
///
/// # Arguments
///
/// * `name` - A two character square name, file `a`-`h` then rank `1`-`8`
///
/// # Returns
///
/// * The tile index, or [`ChessError::InvalidSquare`] when malformed
pub fn parse_square(name: &str) -> ChessResult<Square> {
    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidSquare(name.to_string()));
    }
    let file = match bytes[0] {
        b @ b'a'..=b'h' => (b - b'a') as usize,
        _ => return Err(ChessError::InvalidSquare(name.to_string())),
    };
    let rank = match bytes[1] {
        b @ b'1'..=b'8' => (b - b'0') as usize,
        _ => return Err(ChessError::InvalidSquare(name.to_string())),
    };
    Ok((8 - rank) * TILES_PER_ROW + file)
}
