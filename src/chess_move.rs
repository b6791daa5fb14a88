//! Moves and their effect on a position.
//!
//! A [`Move`] carries the piece that moves (and so its origin), the
//! destination, and whatever the kind needs: the captured piece, the
//! promotion choice, or the rook that travels with a castling king.

use std::fmt;

use crate::error::{ChessError, ChessResult};
use crate::position::{Builder, Color, Piece, PieceType, Position};
use crate::utils::{file_name, parse_square, square_name, Square};
use crate::zorbrist::Zobrist;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Quiet { piece: Piece, destination: Square },
    Capture { piece: Piece, destination: Square, captured: Piece },
    /// Pawn double step from its home row
    PawnJump { piece: Piece, destination: Square },
    EnPassant { piece: Piece, destination: Square, captured: Piece },
    /// Wraps a pawn quiet move or capture that reaches the last row
    Promotion {
        piece: Piece,
        destination: Square,
        captured: Option<Piece>,
        promote_to: PieceType,
    },
    KingsideCastle {
        king: Piece,
        destination: Square,
        rook: Piece,
        rook_destination: Square,
    },
    QueensideCastle {
        king: Piece,
        destination: Square,
        rook: Piece,
        rook_destination: Square,
    },
    /// Sentinel for "no move"; it cannot be applied
    Null,
}

impl Move {
    pub fn is_null(&self) -> bool {
        matches!(self, Move::Null)
    }

    /// The piece as it stood before moving.
    ///
    /// # Panics
    ///
    /// Panics for [`Move::Null`].
    pub fn moved_piece(&self) -> Piece {
        match *self {
            Move::Quiet { piece, .. }
            | Move::Capture { piece, .. }
            | Move::PawnJump { piece, .. }
            | Move::EnPassant { piece, .. }
            | Move::Promotion { piece, .. } => piece,
            Move::KingsideCastle { king, .. } | Move::QueensideCastle { king, .. } => king,
            Move::Null => panic!("the null move has no moved piece"),
        }
    }

    pub fn origin(&self) -> Square {
        self.moved_piece().position
    }

    /// # Panics
    ///
    /// Panics for [`Move::Null`].
    pub fn destination(&self) -> Square {
        match *self {
            Move::Quiet { destination, .. }
            | Move::Capture { destination, .. }
            | Move::PawnJump { destination, .. }
            | Move::EnPassant { destination, .. }
            | Move::Promotion { destination, .. }
            | Move::KingsideCastle { destination, .. }
            | Move::QueensideCastle { destination, .. } => destination,
            Move::Null => panic!("the null move has no destination"),
        }
    }

    pub fn captured_piece(&self) -> Option<Piece> {
        match *self {
            Move::Capture { captured, .. } | Move::EnPassant { captured, .. } => Some(captured),
            Move::Promotion { captured, .. } => captured,
            _ => None,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured_piece().is_some()
    }

    pub fn is_castle(&self) -> bool {
        matches!(self, Move::KingsideCastle { .. } | Move::QueensideCastle { .. })
    }

    /// The rook moved by a castle and where it lands.
    pub fn castle_rook(&self) -> Option<(Piece, Square)> {
        match *self {
            Move::KingsideCastle { rook, rook_destination, .. }
            | Move::QueensideCastle { rook, rook_destination, .. } => {
                Some((rook, rook_destination))
            }
            _ => None,
        }
    }

    pub fn promotion(&self) -> Option<PieceType> {
        match *self {
            Move::Promotion { promote_to, .. } => Some(promote_to),
            _ => None,
        }
    }

    /// The moving piece as it stands after the move.
    pub fn landed_piece(&self) -> Piece {
        let landed = self.moved_piece().moved_to(self.destination());
        match self.promotion() {
            Some(piece_type) => Piece { piece_type, ..landed },
            None => landed,
        }
    }

    /// Whether the destination is attacked by this move's piece. Pawn pushes
    /// move onto a tile without threatening it.
    pub fn attacks_destination(&self) -> bool {
        match self {
            Move::Quiet { piece, .. } => piece.piece_type != PieceType::Pawn,
            Move::Capture { .. } | Move::EnPassant { .. } => true,
            Move::Promotion { captured, .. } => captured.is_some(),
            Move::PawnJump { .. }
            | Move::KingsideCastle { .. }
            | Move::QueensideCastle { .. }
            | Move::Null => false,
        }
    }

    /// The plain move a promotion wraps; other moves return themselves.
    pub fn inner(&self) -> Move {
        match *self {
            Move::Promotion { piece, destination, captured: Some(captured), .. } => {
                Move::Capture { piece, destination, captured }
            }
            Move::Promotion { piece, destination, captured: None, .. } => {
                Move::Quiet { piece, destination }
            }
            other => other,
        }
    }

    /// Coordinate form such as `e2e4` or `e7e8q`.
    pub fn coordinate(&self) -> String {
        if self.is_null() {
            return "0000".to_string();
        }
        let mut text = format!("{}{}", square_name(self.origin()), square_name(self.destination()));
        if let Some(piece_type) = self.promotion() {
            text.push(piece_type.letter().to_ascii_lowercase());
        }
        text
    }

    /// Produces the position reached by playing this move.
    ///
    /// # Panics
    ///
    /// Panics for [`Move::Null`].
    pub fn apply(&self, position: &Position) -> Position {
        let mut builder = self.stage(position);
        let mover = self.moved_piece();

        let halfmove_clock = if mover.piece_type == PieceType::Pawn || self.is_capture() {
            0
        } else {
            position.halfmove_clock() + 1
        };
        let fullmove_number = match mover.color {
            Color::White => position.fullmove_number(),
            Color::Black => position.fullmove_number() + 1,
        };

        builder
            .set_active_color(mover.color.opponent())
            .set_clocks(halfmove_clock, fullmove_number)
            .set_hash(Zobrist::global().update_hash(position.hash(), position, self));
        builder.build()
    }

    /// Stages the board after this move; side to move and clocks are left
    /// for [`Move::apply`].
    fn stage(&self, position: &Position) -> Builder {
        if let Move::Null = self {
            panic!("the null move cannot be applied");
        }
        if self.promotion().is_some() {
            let mut builder = self.inner().stage(position);
            builder.set_piece(self.landed_piece());
            return builder;
        }

        let mut builder = Builder::new();
        for piece in position.all_pieces() {
            builder.set_piece(*piece);
        }
        for color in Color::ALL {
            builder.set_castled(color, position.is_castled(color));
        }

        let mover = self.moved_piece();
        builder.clear_tile(mover.position);
        if let Move::EnPassant { captured, .. } = self {
            builder.clear_tile(captured.position);
        }
        if let Some((rook, rook_destination)) = self.castle_rook() {
            builder
                .clear_tile(rook.position)
                .set_piece(rook.moved_to(rook_destination))
                .set_castled(mover.color, true);
        }
        builder.set_piece(self.landed_piece());

        if let Move::PawnJump { .. } = self {
            builder.set_en_passant_pawn(Some(self.landed_piece()));
        }
        builder
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Null => write!(f, "null"),
            Move::KingsideCastle { .. } => write!(f, "O-O"),
            Move::QueensideCastle { .. } => write!(f, "O-O-O"),
            Move::Promotion { promote_to, .. } => {
                write!(f, "{}={}", self.inner(), promote_to.letter())
            }
            Move::EnPassant { piece, destination, .. } => {
                write!(f, "{}x{}e.p.", file_name(piece.position), square_name(*destination))
            }
            Move::Quiet { piece, destination } | Move::PawnJump { piece, destination } => {
                match piece.piece_type {
                    PieceType::Pawn => write!(f, "{}", square_name(*destination)),
                    other => write!(f, "{}{}", other.letter(), square_name(*destination)),
                }
            }
            Move::Capture { piece, destination, .. } => match piece.piece_type {
                PieceType::Pawn => {
                    write!(f, "{}x{}", file_name(piece.position), square_name(*destination))
                }
                other => write!(f, "{}x{}", other.letter(), square_name(*destination)),
            },
        }
    }
}

/// Resolves user coordinates to one of the side to move's candidate moves.
pub struct MoveFactory;

impl MoveFactory {
    /// Finds the candidate move of the side to move that goes from `from`
    /// to `to`. Promotions default to a queen when `promotion` is `None`.
    /// Returns [`Move::Null`] when nothing matches.
    pub fn create_move(
        position: &Position,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Move {
        let wanted = promotion.unwrap_or(PieceType::Queen);
        position
            .current_player()
            .candidate_moves()
            .into_iter()
            .find(|mv| {
                mv.origin() == from
                    && mv.destination() == to
                    && mv.promotion().map_or(true, |piece_type| piece_type == wanted)
            })
            .unwrap_or(Move::Null)
    }

    /// Parses coordinate input such as `e2e4` or `e7e8n`.
    pub fn parse_coordinate(position: &Position, text: &str) -> ChessResult<Move> {
        let text = text.trim();
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(ChessError::InvalidSquare(text.to_string()));
        }
        let from = parse_square(&text[0..2])?;
        let to = parse_square(&text[2..4])?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(letter) => match PieceType::from_letter(letter)?.0 {
                PieceType::Pawn | PieceType::King => return Err(ChessError::InvalidPiece(letter)),
                piece_type => Some(piece_type),
            },
        };
        match MoveFactory::create_move(position, from, to, promotion) {
            Move::Null => Err(ChessError::NoSuchMove {
                from: square_name(from),
                to: square_name(to),
            }),
            mv => Ok(mv),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(position: &Position, coordinates: &str) -> Position {
        MoveFactory::parse_coordinate(position, coordinates).unwrap().apply(position)
    }

    #[test]
    fn test_pawn_jump_records_en_passant_pawn() {
        let start = Position::new();
        let mv = MoveFactory::parse_coordinate(&start, "e2e4").unwrap();
        assert!(matches!(mv, Move::PawnJump { .. }));
        assert_eq!(mv.to_string(), "e4");

        let next = mv.apply(&start);
        assert_eq!(next.active_color(), Color::Black);
        assert_eq!(next.en_passant_pawn().map(|p| p.position), Some(parse_square("e4").unwrap()));
        assert_eq!(next.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    }

    #[test]
    fn test_capture_exd5() {
        let position = play(&play(&Position::new(), "e2e4"), "d7d5");
        let mv = MoveFactory::parse_coordinate(&position, "e4d5").unwrap();
        assert_eq!(mv.to_string(), "exd5");
        assert_eq!(mv.captured_piece().map(|p| p.piece_type), Some(PieceType::Pawn));

        let next = mv.apply(&position);
        assert_eq!(next.to_fen(), "rnbqkbnr/ppp1pppp/8/3P4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2");
        assert_eq!(next.pieces(Color::Black).len(), 15);
    }

    #[test]
    fn test_en_passant_removes_the_jumped_pawn() {
        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        let position = Position::read_fen(fen).unwrap();
        let mv = MoveFactory::parse_coordinate(&position, "e5f6").unwrap();
        assert!(matches!(mv, Move::EnPassant { .. }));
        assert_eq!(mv.to_string(), "exf6e.p.");

        let next = mv.apply(&position);
        assert_eq!(next.piece_at(parse_square("f5").unwrap()), None);
        assert_eq!(
            next.piece_at(parse_square("f6").unwrap()).map(|p| (p.piece_type, p.color)),
            Some((PieceType::Pawn, Color::White))
        );
    }

    #[test]
    fn test_promotion_replaces_pawn() {
        let position = Position::read_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let push = MoveFactory::parse_coordinate(&position, "a7a8r").unwrap();
        assert_eq!(push.to_string(), "a8=R");
        assert_eq!(push.inner().to_string(), "a8");
        let next = push.apply(&position);
        assert_eq!(next.piece_at(0).map(|p| p.piece_type), Some(PieceType::Rook));

        let capture = MoveFactory::create_move(&position, 8, 1, None);
        assert_eq!(capture.to_string(), "axb8=Q");
        let next = capture.apply(&position);
        assert_eq!(next.to_fen(), "1Q2k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn test_castling_moves_king_and_rook() {
        let position = Position::read_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").unwrap();
        let short = MoveFactory::parse_coordinate(&position, "e1g1").unwrap();
        assert_eq!(short.to_string(), "O-O");
        let next = short.apply(&position);
        assert_eq!(next.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 10");
        assert!(next.is_castled(Color::White));

        let long = MoveFactory::parse_coordinate(&next, "e8c8").unwrap();
        assert_eq!(long.to_string(), "O-O-O");
        let after = long.apply(&next);
        assert_eq!(after.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 5 11");
        assert!(after.is_castled(Color::Black));
    }

    #[test]
    fn test_piece_move_notation() {
        let start = Position::new();
        assert_eq!(MoveFactory::parse_coordinate(&start, "g1f3").unwrap().to_string(), "Nf3");
        assert_eq!(MoveFactory::parse_coordinate(&start, "g1f3").unwrap().coordinate(), "g1f3");
    }

    #[test]
    fn test_create_move_returns_null_when_unmatched() {
        let start = Position::new();
        assert!(MoveFactory::create_move(&start, 52, 20, None).is_null());
        assert_eq!(
            MoveFactory::parse_coordinate(&start, "e2e5"),
            Err(ChessError::NoSuchMove { from: "e2".into(), to: "e5".into() })
        );
        assert!(MoveFactory::parse_coordinate(&start, "e2").is_err());
    }

    #[test]
    #[should_panic(expected = "null move")]
    fn test_null_move_cannot_be_applied() {
        Move::Null.apply(&Position::new());
    }
}
