//! Mailbox chess engine: position model, legal move generation, Zobrist
//! hashing, static evaluation and a fixed-depth alpha-beta search.
//!
//! [`Game`] ties the pieces together for a front end. The free functions
//! [`legal_moves`], [`make_move`] and [`search`] expose the same core
//! operations for callers that manage positions themselves.

pub mod chess_move;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod movegen_tables;
pub mod movegeneration;
pub mod moveorder;
pub mod perft;
pub mod player;
pub mod position;
pub mod search;
pub mod transposition;
pub mod ui;
pub mod utils;
pub mod zorbrist;

use chess_move::{Move, MoveFactory};
use error::{ChessError, ChessResult};
use player::{MoveStatus, MoveTransition};
use position::{PieceType, Position};
use search::{Search, SearchConfig, SearchOutcome};
use utils::{square_name, Square};

/// A game in progress: the current position plus everything played so far.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    history: Vec<Position>,
    move_log: Vec<String>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// Creates a game from the standard starting position.
    pub fn new() -> Game {
        Game::from_position(Position::new())
    }

    pub fn from_fen(fen: &str) -> ChessResult<Game> {
        Ok(Game::from_position(Position::read_fen(fen)?))
    }

    pub fn from_position(position: Position) -> Game {
        Game {
            history: vec![position.clone()],
            position,
            move_log: Vec::new(),
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Every position reached, starting with the initial one.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Notation of every move played, with `+` or `#` appended for checks.
    pub fn move_log(&self) -> &[String] {
        &self.move_log
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.position)
    }

    /// Plays `mv` if it is legal. The game is untouched otherwise.
    pub fn make_move(&mut self, mv: &Move) -> MoveStatus {
        let transition = make_move(&self.position, mv);
        let status = transition.status();
        if let Some(next) = transition.into_position() {
            let opponent = next.current_player();
            let suffix = if opponent.in_checkmate() {
                "#"
            } else if opponent.in_check() {
                "+"
            } else {
                ""
            };
            self.move_log.push(format!("{mv}{suffix}"));
            self.history.push(next.clone());
            self.position = next;
        }
        status
    }

    /// Plays the move from `from` to `to`, promoting to `promotion` (a queen
    /// when omitted). Fails when the side to move has no such move at all.
    pub fn submit_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> ChessResult<MoveStatus> {
        match MoveFactory::create_move(&self.position, from, to, promotion) {
            Move::Null => Err(ChessError::NoSuchMove {
                from: square_name(from),
                to: square_name(to),
            }),
            mv => Ok(self.make_move(&mv)),
        }
    }

    /// Plays a move given in coordinate form such as `e2e4` or `e7e8n`.
    pub fn submit_coordinate(&mut self, text: &str) -> ChessResult<MoveStatus> {
        let mv = MoveFactory::parse_coordinate(&self.position, text)?;
        Ok(self.make_move(&mv))
    }

    pub fn in_check(&self) -> bool {
        self.position.current_player().in_check()
    }

    pub fn in_checkmate(&self) -> bool {
        self.position.current_player().in_checkmate()
    }

    pub fn in_stalemate(&self) -> bool {
        self.position.current_player().in_stalemate()
    }

    pub fn is_over(&self) -> bool {
        !self.position.current_player().has_escape_moves()
    }

    /// Searches the current position to `depth` plies.
    pub fn search(&self, depth: u32) -> SearchOutcome {
        Search::new(SearchConfig::new(depth)).find_best_move(&self.position)
    }
}

/// Legal moves of the side to move.
pub fn legal_moves(position: &Position) -> Vec<Move> {
    position.current_player().legal_moves()
}

/// Tries `mv` for the side to move.
pub fn make_move(position: &Position, mv: &Move) -> MoveTransition {
    position.current_player().make_move(mv)
}

/// Best move for the side to move at `depth` plies, or `None` when there is
/// no legal move.
pub fn search(position: &Position, depth: u32) -> Option<Move> {
    Search::new(SearchConfig::new(depth)).find_best_move(position).best_move
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_square;

    fn sq(name: &str) -> Square {
        parse_square(name).unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.history().len(), 1);
        assert!(game.move_log().is_empty());
        assert!(!game.is_over());
    }

    #[test]
    fn test_move_log_marks_checks() {
        let mut game = Game::new();
        for text in ["e2e4", "f7f6", "d2d4", "g7g5"] {
            assert_eq!(game.submit_coordinate(text).unwrap(), MoveStatus::Done);
        }
        assert_eq!(game.submit_move(sq("d1"), sq("h5"), None).unwrap(), MoveStatus::Done);
        assert_eq!(game.move_log(), ["e4", "f6", "d4", "g5", "Qh5#"]);
        assert!(game.in_checkmate());
        assert!(game.is_over());
        assert_eq!(game.history().len(), 6);
    }

    #[test]
    fn test_rejected_move_leaves_game_untouched() {
        let mut game = Game::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let before = game.position().to_fen();
        let status = game.submit_move(sq("e2"), sq("d3"), None).unwrap();
        assert_eq!(status, MoveStatus::LeavesPlayerInCheck);
        assert_eq!(game.position().to_fen(), before);
        assert!(game.move_log().is_empty());
    }

    #[test]
    fn test_unknown_move_is_an_error() {
        let mut game = Game::new();
        assert_eq!(
            game.submit_move(sq("e2"), sq("e5"), None),
            Err(ChessError::NoSuchMove { from: "e2".into(), to: "e5".into() })
        );
    }

    #[test]
    fn test_free_functions() {
        let position = Position::new();
        let moves = legal_moves(&position);
        assert_eq!(moves.len(), 20);
        let transition = make_move(&position, &moves[0]);
        assert!(transition.status().is_done());
        assert!(search(&position, 1).is_some());
    }
}
