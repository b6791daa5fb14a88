//! Chess move generation module.
//!
//! Generates pseudo-legal moves by walking the padded mailbox board: moves
//! that respect piece movement and occupancy but may leave the mover's own
//! king attacked. Castling is generated separately because it depends on
//! the opponent's attacks. Legality is decided later by
//! [`crate::player::Player::make_move`].

use crate::chess_move::Move;
use crate::movegen_tables::{offsets_for, PAWN_CAPTURE_SHIFTS};
use crate::position::*;
use crate::utils::{row_of, step, Square};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CastlingSide {
    Kingside,
    Queenside,
}

/// Tiles involved in one castle, derived from the king's home tile.
struct CastleLayout {
    rook_home: Square,
    king_destination: Square,
    rook_destination: Square,
    must_be_empty: [Square; 3],
    empty_count: usize,
    must_be_safe: [Square; 2],
}

impl CastleLayout {
    fn empty_tiles(&self) -> &[Square] {
        &self.must_be_empty[..self.empty_count]
    }
}

impl CastlingSide {
    fn layout(self, color: Color) -> CastleLayout {
        let king = color.king_home();
        match self {
            CastlingSide::Kingside => CastleLayout {
                rook_home: color.kingside_rook_home(),
                king_destination: king + 2,
                rook_destination: king + 1,
                must_be_empty: [king + 1, king + 2, 0],
                empty_count: 2,
                must_be_safe: [king + 1, king + 2],
            },
            CastlingSide::Queenside => CastleLayout {
                rook_home: color.queenside_rook_home(),
                king_destination: king - 2,
                rook_destination: king - 1,
                must_be_empty: [king - 1, king - 2, king - 3],
                empty_count: 3,
                must_be_safe: [king - 1, king - 2],
            },
        }
    }
}

/// Generates all pseudo-legal moves of one side, castles excluded.
///
/// Pieces are visited in tile order, so the result order is stable for a
/// given position.
///
/// # Arguments
///
/// * `position` - The position to generate from
/// * `color` - Whose moves to generate; need not be the side to move
///
/// # Returns
///
/// * A vector of moves, promotions expanded into one move per piece choice
pub fn pseudo_legal_moves(position: &Position, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    for piece in position.pieces(color) {
        match piece.piece_type {
            PieceType::Pawn => generate_pawn_moves(position, piece, &mut moves),
            other => {
                let (offsets, slides) = offsets_for(other);
                generate_piece_moves(position, piece, offsets, slides, &mut moves);
            }
        }
    }
    moves
}

fn generate_piece_moves(
    position: &Position,
    piece: &Piece,
    offsets: &[i32],
    slides: bool,
    moves: &mut Vec<Move>,
) {
    for &offset in offsets {
        let mut current = piece.position;
        while let Some(target) = step(current, offset) {
            match position.tile(target) {
                Tile::Empty => {
                    moves.push(Move::Quiet { piece: *piece, destination: target });
                    if !slides {
                        break;
                    }
                    current = target;
                }
                Tile::Occupied(other) => {
                    if other.color != piece.color {
                        moves.push(Move::Capture {
                            piece: *piece,
                            destination: target,
                            captured: other,
                        });
                    }
                    break;
                }
            }
        }
    }
}

fn generate_pawn_moves(position: &Position, piece: &Piece, moves: &mut Vec<Move>) {
    let color = piece.color;
    let forward = color.pawn_direction();

    if let Some(target) = step(piece.position, forward) {
        if !position.tile(target).is_occupied() {
            push_pawn_advance(piece, target, None, moves);

            let on_home_row = row_of(piece.position) == color.pawn_home_row();
            if !piece.moved && on_home_row {
                if let Some(jump) = step(target, forward) {
                    if !position.tile(jump).is_occupied() {
                        moves.push(Move::PawnJump { piece: *piece, destination: jump });
                    }
                }
            }
        }
    }

    for shift in PAWN_CAPTURE_SHIFTS {
        let Some(target) = step(piece.position, forward + shift) else {
            continue;
        };
        match position.tile(target) {
            Tile::Occupied(other) if other.color != color => {
                push_pawn_advance(piece, target, Some(other), moves);
            }
            Tile::Empty => {
                // the jumped pawn stands beside us on the file we move to
                if let Some(pawn) = position.en_passant_pawn() {
                    if pawn.color != color && Some(pawn.position) == step(piece.position, shift) {
                        moves.push(Move::EnPassant {
                            piece: *piece,
                            destination: target,
                            captured: pawn,
                        });
                    }
                }
            }
            Tile::Occupied(_) => {}
        }
    }
}

/// Pushes a pawn step or capture, expanding it into promotions on the last row.
fn push_pawn_advance(
    piece: &Piece,
    destination: Square,
    captured: Option<Piece>,
    moves: &mut Vec<Move>,
) {
    if row_of(destination) == piece.color.promotion_row() {
        for promote_to in PieceType::PROMOTIONS {
            moves.push(Move::Promotion { piece: *piece, destination, captured, promote_to });
        }
        return;
    }
    match captured {
        Some(captured) => moves.push(Move::Capture { piece: *piece, destination, captured }),
        None => moves.push(Move::Quiet { piece: *piece, destination }),
    }
}

/// Whether `attacker` attacks `tile`.
///
/// Pawn pushes do not count; pawn diagonals count even onto empty tiles.
/// `attacker_moves` must be the attacker's pseudo-legal moves in `position`.
pub fn is_attacked(
    position: &Position,
    tile: Square,
    attacker: Color,
    attacker_moves: &[Move],
) -> bool {
    let by_move = attacker_moves
        .iter()
        .any(|mv| mv.destination() == tile && mv.attacks_destination());
    by_move || pawn_attacks(position, tile, attacker)
}

fn pawn_attacks(position: &Position, tile: Square, attacker: Color) -> bool {
    PAWN_CAPTURE_SHIFTS.iter().any(|shift| {
        match step(tile, -(attacker.pawn_direction() + shift)) {
            Some(from) => matches!(position.piece_at(from), Some(piece)
                if piece.piece_type == PieceType::Pawn && piece.color == attacker),
            None => false,
        }
    })
}

/// Checks every castling precondition except "not currently in check".
///
/// # Arguments
///
/// * `position` - The position to test
/// * `color` - The side that wants to castle
/// * `side` - Which rook to castle with
/// * `opponent_moves` - The opponent's pseudo-legal moves in `position`
pub fn can_castle(
    position: &Position,
    color: Color,
    side: CastlingSide,
    opponent_moves: &[Move],
) -> bool {
    let unmoved = |tile: Square, piece_type: PieceType| {
        matches!(position.piece_at(tile), Some(piece)
            if piece.piece_type == piece_type && piece.color == color && !piece.moved)
    };
    let layout = side.layout(color);

    unmoved(color.king_home(), PieceType::King)
        && unmoved(layout.rook_home, PieceType::Rook)
        && layout.empty_tiles().iter().all(|&tile| !position.tile(tile).is_occupied())
        && layout
            .must_be_safe
            .iter()
            .all(|&tile| !is_attacked(position, tile, color.opponent(), opponent_moves))
}

/// Generates the castles available to `color`; none while in check.
pub fn castle_moves(
    position: &Position,
    color: Color,
    opponent_moves: &[Move],
    in_check: bool,
) -> Vec<Move> {
    let mut moves = Vec::new();
    if in_check {
        return moves;
    }
    for side in [CastlingSide::Kingside, CastlingSide::Queenside] {
        if !can_castle(position, color, side, opponent_moves) {
            continue;
        }
        let layout = side.layout(color);
        // can_castle guarantees both pieces are present
        let king = position.piece_at(color.king_home());
        let rook = position.piece_at(layout.rook_home);
        let (Some(king), Some(rook)) = (king, rook) else {
            continue;
        };
        moves.push(match side {
            CastlingSide::Kingside => Move::KingsideCastle {
                king,
                destination: layout.king_destination,
                rook,
                rook_destination: layout.rook_destination,
            },
            CastlingSide::Queenside => Move::QueensideCastle {
                king,
                destination: layout.king_destination,
                rook,
                rook_destination: layout.rook_destination,
            },
        });
    }
    moves
}
