//! Static position evaluation.
//!
//! Scores are in centipawns from White's point of view: each side is scored
//! on its own and Black's total is subtracted from White's.

use crate::player::Player;
use crate::position::{Color, Piece, PieceType, Position};
use crate::utils::{file_of, row_of};

pub const CHECK_BONUS: i32 = 10;
pub const CHECKMATE_BONUS: i32 = 20000;
pub const CASTLE_BONUS: i32 = 60;
pub const QUEEN_DEVELOPMENT_PENALTY: i32 = -50;

const MOBILITY_WEIGHT: i32 = 2;
const POSITION_WEIGHT: i32 = 2;
const ATTACK_WEIGHT: i32 = 2;

/// Castling earns its bonus only once this many half-moves have been played.
const CASTLE_BONUS_AFTER_PLY: u32 = 6;
/// Early queen moves are penalised up to and including this half-move.
const QUEEN_OPENING_PLY: u32 = 12;

// Piece-square tables for positional bonuses
// Values are in centipawns, indexed by tile from White's side (tile 0 = a8)
// For Black, we flip the table vertically
const PAWN_TABLE: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
    5,  5, 10, 25, 25, 10,  5,  5,
    0,  0,  0, 20, 20,  0,  0,  0,
    5, -5,-10,  0,  0,-10, -5,  5,
    5, 10, 10,-20,-20, 10, 10,  5,
    0,  0,  0,  0,  0,  0,  0,  0
];

const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50
];

const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20
];

const ROOK_TABLE: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0,  0,
    5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    0,  0,  0,  5,  5,  0,  0,  0
];

const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
    0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20
];

const KING_MIDDLEGAME_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20
];

const KING_ENDGAME_TABLE: [i32; 64] = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -50,-30,-30,-30,-30,-30,-30,-50
];

/// Evaluates `position` with the mate bonus scaled for `depth`.
pub fn evaluate(position: &Position, depth: u32) -> i32 {
    Evaluation::new(position, depth).evaluate_position()
}

/// Table index for a tile, mirrored vertically for Black.
fn table_index(tile: usize, color: Color) -> usize {
    match color {
        Color::White => tile,
        Color::Black => 8 * (7 - row_of(tile)) + file_of(tile),
    }
}

/// Endgame unless some side keeps its queen together with another piece
/// that is neither a pawn nor the king.
pub fn in_endgame(position: &Position) -> bool {
    !Color::ALL.iter().any(|&color| {
        let pieces = position.pieces(color);
        let has_queen = pieces.iter().any(|p| p.piece_type == PieceType::Queen);
        let has_minor_or_rook = pieces.iter().any(|p| {
            matches!(p.piece_type, PieceType::Knight | PieceType::Bishop | PieceType::Rook)
        });
        has_queen && has_minor_or_rook
    })
}

pub struct Evaluation<'a> {
    position: &'a Position,
    depth: u32,
}

impl<'a> Evaluation<'a> {
    pub fn new(position: &'a Position, depth: u32) -> Self {
        Evaluation { position, depth }
    }

    /// Evaluates a chess position from White's perspective.
    /// Returns a score in centipawns, positive for White advantage, negative for Black advantage.
    pub fn evaluate_position(&self) -> i32 {
        self.score_side(self.position.player(Color::White))
            - self.score_side(self.position.player(Color::Black))
    }

    fn score_side(&self, player: Player<'a>) -> i32 {
        self.material(player)
            + self.mobility(player)
            + self.piece_positions(player)
            + self.attacks(player)
            + self.check(player)
            + self.checkmate(player)
            + self.castled(player)
            + self.queen_development(player)
    }

    fn material(&self, player: Player<'a>) -> i32 {
        player.active_pieces().iter().map(Piece::value).sum()
    }

    fn mobility(&self, player: Player<'a>) -> i32 {
        let own = player.mobility() as i32;
        let theirs = player.opponent().mobility() as i32;
        MOBILITY_WEIGHT * (own - theirs)
    }

    fn piece_positions(&self, player: Player<'a>) -> i32 {
        let endgame = in_endgame(self.position);
        let queen_in_opening = self.in_queen_opening();
        let total: i32 = player
            .active_pieces()
            .iter()
            .map(|piece| {
                let index = table_index(piece.position, player.color());
                match piece.piece_type {
                    PieceType::Pawn => PAWN_TABLE[index],
                    PieceType::Knight => KNIGHT_TABLE[index],
                    PieceType::Bishop => BISHOP_TABLE[index],
                    PieceType::Rook => ROOK_TABLE[index],
                    PieceType::Queen if queen_in_opening => 0,
                    PieceType::Queen => QUEEN_TABLE[index],
                    PieceType::King if endgame => KING_ENDGAME_TABLE[index],
                    PieceType::King => KING_MIDDLEGAME_TABLE[index],
                }
            })
            .sum();
        POSITION_WEIGHT * total
    }

    fn attacks(&self, player: Player<'a>) -> i32 {
        ATTACK_WEIGHT * player.capture_count() as i32
    }

    fn check(&self, player: Player<'a>) -> i32 {
        if player.opponent().in_check() {
            CHECK_BONUS
        } else {
            0
        }
    }

    fn checkmate(&self, player: Player<'a>) -> i32 {
        if player.opponent().in_checkmate() {
            CHECKMATE_BONUS * (self.depth as i32 + 1)
        } else {
            0
        }
    }

    fn castled(&self, player: Player<'a>) -> i32 {
        if self.position.game_ply() > CASTLE_BONUS_AFTER_PLY && player.is_castled() {
            CASTLE_BONUS
        } else {
            0
        }
    }

    fn in_queen_opening(&self) -> bool {
        self.position.game_ply() <= QUEEN_OPENING_PLY
    }

    fn queen_development(&self, player: Player<'a>) -> i32 {
        let queen_moved = player
            .active_pieces()
            .iter()
            .any(|p| p.piece_type == PieceType::Queen && p.moved);
        if self.in_queen_opening() && queen_moved {
            QUEEN_DEVELOPMENT_PENALTY
        } else {
            0
        }
    }
}
