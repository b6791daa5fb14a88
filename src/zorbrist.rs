//! Zobrist fingerprints for positions.
//!
//! Keys are drawn once from a seeded generator so fingerprints are stable
//! across runs. [`Zobrist::update_hash`] derives a child fingerprint from its
//! parent and the move played; it always agrees with [`Zobrist::hash_position`].

use std::sync::OnceLock;

use rand::prelude::*;

use crate::chess_move::Move;
use crate::position::{CastlingRights, Color, Piece, Position};
use crate::utils::{file_of, NUM_TILES};

const DEFAULT_SEED: u64 = 0xDEADBEEF;
const CHECK_SEED: u64 = 0x5EED_C0DE;

static GLOBAL: OnceLock<Zobrist> = OnceLock::new();
static CHECK: OnceLock<Zobrist> = OnceLock::new();

#[derive(Clone, Debug)]
pub struct Zobrist {
    piece_square: [[[u64; 6]; 2]; NUM_TILES], // tile, color, piece type
    black_to_move: u64,
    castling_rights: [u64; 4], // one per right, in `CastlingRights::EACH` order
    en_passant_file: [u64; 8],
}

impl Zobrist {
    pub fn new() -> Self {
        Zobrist::with_seed(DEFAULT_SEED)
    }

    /// Builds an independent key set from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut z = Zobrist {
            piece_square: [[[0; 6]; 2]; NUM_TILES],
            black_to_move: rng.gen(),
            castling_rights: [0; 4],
            en_passant_file: [0; 8],
        };

        for tile in z.piece_square.iter_mut() {
            for color in tile.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        for key in z.castling_rights.iter_mut() {
            *key = rng.gen();
        }
        for key in z.en_passant_file.iter_mut() {
            *key = rng.gen();
        }

        z
    }

    /// Process-wide key set used by every position.
    pub fn global() -> &'static Zobrist {
        GLOBAL.get_or_init(Zobrist::new)
    }

    /// Independent key set used to confirm cache hits.
    pub fn check() -> &'static Zobrist {
        CHECK.get_or_init(|| Zobrist::with_seed(CHECK_SEED))
    }

    fn piece_key(&self, piece: &Piece) -> u64 {
        self.piece_square[piece.position][piece.color.index()][piece.piece_type.index()]
    }

    /// XOR of the keys of every right held in `rights`.
    fn castling_key(&self, rights: CastlingRights) -> u64 {
        CastlingRights::EACH
            .iter()
            .zip(self.castling_rights)
            .filter(|(right, _)| rights.contains(**right))
            .fold(0, |hash, (_, key)| hash ^ key)
    }

    /// Full fingerprint computed from scratch.
    pub fn hash_position(&self, pos: &Position) -> u64 {
        let mut hash = 0;

        for piece in pos.all_pieces() {
            hash ^= self.piece_key(piece);
        }

        if pos.active_color() == Color::Black {
            hash ^= self.black_to_move;
        }

        hash ^= self.castling_key(pos.castling_rights());

        if let Some(pawn) = pos.en_passant_pawn() {
            hash ^= self.en_passant_file[file_of(pawn.position)];
        }

        hash
    }

    /// Fingerprint of the position reached by playing `mv` on `before`,
    /// whose fingerprint is `hash`.
    pub fn update_hash(&self, hash: u64, before: &Position, mv: &Move) -> u64 {
        let mut hash = hash
            ^ self.piece_key(&mv.moved_piece())
            ^ self.piece_key(&mv.landed_piece());

        if let Some(captured) = mv.captured_piece() {
            hash ^= self.piece_key(&captured);
        }

        if let Some((rook, rook_destination)) = mv.castle_rook() {
            hash ^= self.piece_key(&rook) ^ self.piece_key(&rook.moved_to(rook_destination));
        }

        if let Some(pawn) = before.en_passant_pawn() {
            hash ^= self.en_passant_file[file_of(pawn.position)];
        }
        if let Move::PawnJump { destination, .. } = mv {
            hash ^= self.en_passant_file[file_of(*destination)];
        }

        let rights = before.castling_rights();
        hash ^= self.castling_key(rights.revoked_by(&[mv.origin(), mv.destination()]));

        hash ^ self.black_to_move
    }
}

impl Default for Zobrist {
    fn default() -> Self {
        Zobrist::new()
    }
}
