//! A side's view of a position: its moves, its king, and move legality.

use crate::chess_move::Move;
use crate::movegeneration::{castle_moves, is_attacked};
use crate::position::{Color, Piece, Position};

/// Outcome of trying to play a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    Done,
    /// Not among the player's candidate moves
    Illegal,
    /// Would capture the opposing king; never a real move
    KingCapture,
    LeavesPlayerInCheck,
}

impl MoveStatus {
    pub fn is_done(self) -> bool {
        self == MoveStatus::Done
    }
}

/// The result of [`Player::make_move`]. Holds the new position only when
/// the move was played.
#[derive(Debug, Clone)]
pub struct MoveTransition {
    mv: Move,
    status: MoveStatus,
    position: Option<Position>,
}

impl MoveTransition {
    pub fn status(&self) -> MoveStatus {
        self.status
    }

    pub fn mv(&self) -> Move {
        self.mv
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn into_position(self) -> Option<Position> {
        self.position
    }
}

/// Per-side data computed once when a position is built.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlayerState {
    pseudo_legal: Vec<Move>,
    castles: Vec<Move>,
    in_check: bool,
}

impl PlayerState {
    pub(crate) fn new(
        position: &Position,
        color: Color,
        pseudo_legal: Vec<Move>,
        opponent_moves: &[Move],
    ) -> Self {
        let king = position.king(color);
        let in_check = is_attacked(position, king.position, color.opponent(), opponent_moves);
        let castles = castle_moves(position, color, opponent_moves, in_check);
        PlayerState { pseudo_legal, castles, in_check }
    }

    pub(crate) fn pseudo_legal(&self) -> &[Move] {
        &self.pseudo_legal
    }
}

/// Borrowed view of one side of a [`Position`].
#[derive(Debug, Clone, Copy)]
pub struct Player<'a> {
    position: &'a Position,
    color: Color,
}

impl<'a> Player<'a> {
    pub(crate) fn new(position: &'a Position, color: Color) -> Self {
        Player { position, color }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn king(&self) -> Piece {
        self.position.king(self.color)
    }

    pub fn active_pieces(&self) -> &'a [Piece] {
        self.position.pieces(self.color)
    }

    pub fn opponent(&self) -> Player<'a> {
        Player::new(self.position, self.color.opponent())
    }

    fn state(&self) -> &'a PlayerState {
        self.position.player_state(self.color)
    }

    pub fn in_check(&self) -> bool {
        self.state().in_check
    }

    pub fn is_castled(&self) -> bool {
        self.position.is_castled(self.color)
    }

    pub fn castle_moves(&self) -> &'a [Move] {
        &self.state().castles
    }

    /// Pseudo-legal moves followed by castles. Some may leave the king in check.
    pub fn candidate_moves(&self) -> Vec<Move> {
        let state = self.state();
        let mut moves = Vec::with_capacity(state.pseudo_legal.len() + state.castles.len());
        moves.extend_from_slice(&state.pseudo_legal);
        moves.extend_from_slice(&state.castles);
        moves
    }

    /// Number of candidate moves, used as the mobility term.
    pub fn mobility(&self) -> usize {
        let state = self.state();
        state.pseudo_legal.len() + state.castles.len()
    }

    /// Number of candidate moves that capture something.
    pub fn capture_count(&self) -> usize {
        self.state().pseudo_legal.iter().filter(|mv| mv.is_capture()).count()
    }

    fn is_candidate(&self, mv: &Move) -> bool {
        let state = self.state();
        state.pseudo_legal.contains(mv) || state.castles.contains(mv)
    }

    /// Tries to play `mv` for this side.
    ///
    /// Statuses are checked in order: a move that is not a candidate is
    /// `Illegal`; one landing on the opposing king is `KingCapture`; one
    /// after which this side's king is attacked is `LeavesPlayerInCheck`.
    pub fn make_move(&self, mv: &Move) -> MoveTransition {
        if mv.is_null() || !self.is_candidate(mv) {
            return MoveTransition { mv: *mv, status: MoveStatus::Illegal, position: None };
        }
        if mv.destination() == self.opponent().king().position {
            return MoveTransition { mv: *mv, status: MoveStatus::KingCapture, position: None };
        }

        let next = mv.apply(self.position);
        if next.player(self.color).in_check() {
            return MoveTransition {
                mv: *mv,
                status: MoveStatus::LeavesPlayerInCheck,
                position: None,
            };
        }
        MoveTransition { mv: *mv, status: MoveStatus::Done, position: Some(next) }
    }

    /// Candidate moves whose transition completes.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.candidate_moves()
            .into_iter()
            .filter(|mv| self.make_move(mv).status().is_done())
            .collect()
    }

    /// Legal moves paired with the positions they lead to.
    pub fn legal_transitions(&self) -> Vec<(Move, Position)> {
        self.candidate_moves()
            .into_iter()
            .filter_map(|mv| self.make_move(&mv).into_position().map(|next| (mv, next)))
            .collect()
    }

    pub fn has_escape_moves(&self) -> bool {
        self.candidate_moves()
            .iter()
            .any(|mv| self.make_move(mv).status().is_done())
    }

    pub fn in_checkmate(&self) -> bool {
        self.in_check() && !self.has_escape_moves()
    }

    pub fn in_stalemate(&self) -> bool {
        !self.in_check() && !self.has_escape_moves()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_move::MoveFactory;
    use crate::utils::parse_square;

    fn play_all(moves: &[&str]) -> Position {
        let mut position = Position::new();
        for text in moves {
            let mv = MoveFactory::parse_coordinate(&position, text).unwrap();
            position = position.current_player().make_move(&mv).into_position().unwrap();
        }
        position
    }

    #[test]
    fn test_twenty_legal_moves_each_at_start() {
        let position = Position::new();
        assert_eq!(position.player(Color::White).legal_moves().len(), 20);
        assert_eq!(position.player(Color::Black).legal_moves().len(), 20);
        assert!(!position.current_player().in_check());
    }

    #[test]
    fn test_fools_mate() {
        let position = play_all(&["f2f3", "e7e5", "g2g4", "d8h4"]);
        let white = position.current_player();
        assert_eq!(white.color(), Color::White);
        assert!(white.in_check());
        assert!(white.in_checkmate());
        assert!(!white.in_stalemate());
        assert!(white.legal_moves().is_empty());
    }

    #[test]
    fn test_check_with_escape_is_not_mate() {
        let position = play_all(&["e2e4", "d7d5", "f1b5"]);
        let black = position.current_player();
        assert!(black.in_check());
        assert!(!black.in_checkmate());
        // every reply must deal with the check
        for mv in black.legal_moves() {
            let next = mv.apply(&position);
            assert!(!next.player(Color::Black).in_check());
        }
    }

    #[test]
    fn test_stalemate() {
        let position = Position::read_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let black = position.current_player();
        assert!(!black.in_check());
        assert!(black.in_stalemate());
        assert!(!black.in_checkmate());
    }

    #[test]
    fn test_pinned_piece_leaves_player_in_check() {
        let position = Position::read_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let bishop_move = MoveFactory::parse_coordinate(&position, "e2d3").unwrap();
        let transition = position.current_player().make_move(&bishop_move);
        assert_eq!(transition.status(), MoveStatus::LeavesPlayerInCheck);
        assert!(transition.position().is_none());
    }

    #[test]
    fn test_king_capture_is_refused() {
        let position = Position::read_fen("k7/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let capture = MoveFactory::create_move(&position, parse_square("a1").unwrap(), 0, None);
        assert!(capture.is_capture());
        assert_eq!(position.current_player().make_move(&capture).status(), MoveStatus::KingCapture);
    }

    #[test]
    fn test_foreign_move_is_illegal() {
        let start = Position::new();
        let after_e4 = play_all(&["e2e4"]);
        let mv = MoveFactory::parse_coordinate(&start, "d2d4").unwrap();
        // the d-pawn in the other position is a different candidate set
        assert_eq!(after_e4.current_player().make_move(&mv).status(), MoveStatus::Illegal);
        assert_eq!(start.current_player().make_move(&Move::Null).status(), MoveStatus::Illegal);
    }

    #[test]
    fn test_cannot_castle_out_of_check() {
        let position = Position::read_fen("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").unwrap();
        let white = position.current_player();
        assert!(white.in_check());
        assert!(white.castle_moves().is_empty());
    }

    #[test]
    fn test_mobility_counts_castles() {
        let position = Position::read_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let white = position.current_player();
        assert_eq!(white.castle_moves().len(), 2);
        assert_eq!(white.mobility(), white.candidate_moves().len());
    }

    #[test]
    fn test_opponent_view() {
        let position = Position::new();
        let white = position.current_player();
        let black = white.opponent();
        assert_eq!(black.color(), Color::Black);
        assert_eq!(black.king().position, parse_square("e8").unwrap());
        assert_eq!(white.king().position, parse_square("e1").unwrap());
        assert_eq!(black.active_pieces().len(), 16);
        assert_eq!(black.opponent().color(), Color::White);
    }
}
