use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::engine::EngineHandle;
use crate::error::ChessError;
use crate::player::MoveStatus;
use crate::position::Color;
use crate::search::SearchConfig;
use crate::Game;

/// Which sides the engine plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ComputerPlays {
    White,
    Black,
    None,
    Both,
}

impl ComputerPlays {
    pub fn controls(self, color: Color) -> bool {
        match self {
            ComputerPlays::White => color == Color::White,
            ComputerPlays::Black => color == Color::Black,
            ComputerPlays::None => false,
            ComputerPlays::Both => true,
        }
    }
}

#[derive(Error, Debug)]
pub enum UiError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Chess(#[from] ChessError),
}

/// Text-mode game between a human at the terminal and the search worker.
pub struct ChessUI {
    game: Game,
    engine: EngineHandle,
    computer: ComputerPlays,
}

impl ChessUI {
    pub fn new(game: Game, config: SearchConfig, computer: ComputerPlays) -> Result<Self, UiError> {
        Ok(ChessUI {
            game,
            engine: EngineHandle::spawn(config)?,
            computer,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Runs until the game ends, the human quits or input runs out.
    pub fn play_game<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> Result<(), UiError> {
        writeln!(output, "Welcome to Botvinnik!")?;
        writeln!(output, "Enter moves in format: e2e4 (e7e8n to underpromote)")?;
        writeln!(
            output,
            "Commands: 'quit' to exit, 'display' to show board, \
             'moves' to list moves, 'fen' to print the position\n"
        )?;

        loop {
            writeln!(output, "{}", self.game.position())?;

            if self.game.is_over() {
                self.announce_result(&mut output)?;
                return Ok(());
            }

            let color = self.game.position().active_color();
            if self.computer.controls(color) {
                self.engine_turn(&mut output)?;
                continue;
            }

            // Human's turn
            write!(output, "Your move: ")?;
            output.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            match line.trim().to_lowercase().as_str() {
                "quit" => return Ok(()),
                "display" | "" => continue,
                "moves" => {
                    let moves: Vec<String> =
                        self.game.legal_moves().iter().map(|mv| mv.coordinate()).collect();
                    writeln!(output, "{}", moves.join(" "))?;
                }
                "fen" => writeln!(output, "{}", self.game.position().to_fen())?,
                text => match self.game.submit_coordinate(text) {
                    Ok(MoveStatus::Done) => {}
                    Ok(status) => writeln!(output, "Invalid move: {}", describe(status))?,
                    Err(e) => writeln!(output, "Invalid move: {e}")?,
                },
            }
        }
    }

    fn engine_turn<W: Write>(&mut self, output: &mut W) -> Result<(), UiError> {
        writeln!(output, "Engine is thinking...")?;
        let outcome = self.engine.search(self.game.position().clone())?;
        debug!(nodes = outcome.stats.nodes, score = outcome.score, "engine reply received");
        if let Some(mv) = outcome.best_move {
            self.game.make_move(&mv);
            if let Some(played) = self.game.move_log().last() {
                writeln!(output, "Engine plays: {played}")?;
            }
        }
        Ok(())
    }

    fn announce_result<W: Write>(&self, output: &mut W) -> Result<(), UiError> {
        if self.game.in_checkmate() {
            let winner = self.game.position().active_color().opponent();
            writeln!(output, "{winner} wins by checkmate!")?;
        } else {
            writeln!(output, "Game drawn by stalemate!")?;
        }
        Ok(())
    }
}

fn describe(status: MoveStatus) -> &'static str {
    match status {
        MoveStatus::Done => "done",
        MoveStatus::Illegal => "not a legal move",
        MoveStatus::KingCapture => "kings cannot be captured",
        MoveStatus::LeavesPlayerInCheck => "that would leave your king in check",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: Game, computer: ComputerPlays, input: &str) -> (ChessUI, String) {
        let mut ui = ChessUI::new(game, SearchConfig::new(1), computer).unwrap();
        let mut output = Vec::new();
        ui.play_game(input.as_bytes(), &mut output).unwrap();
        (ui, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_human_game_to_checkmate() {
        let (ui, output) = play(Game::new(), ComputerPlays::None, "f2f3\ne7e5\ng2g4\nd8h4\n");
        assert!(ui.game().in_checkmate());
        assert!(output.contains("Black wins by checkmate!"));
    }

    #[test]
    fn test_bad_input_is_reported() {
        let (ui, output) = play(Game::new(), ComputerPlays::None, "e2e5\nzz\nquit\n");
        assert!(output.contains("Invalid move: no move from e2 to e5"));
        assert!(output.contains("Invalid move: invalid square name 'zz'"));
        assert_eq!(ui.game().history().len(), 1);
    }

    #[test]
    fn test_engine_answers_human() {
        let (ui, output) = play(Game::new(), ComputerPlays::Black, "e2e4\nquit\n");
        assert!(output.contains("Engine plays: "));
        assert_eq!(ui.game().move_log().len(), 2);
    }

    #[test]
    fn test_engine_delivers_mate() {
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2";
        let game = Game::from_fen(fen).unwrap();
        let (_, output) = play(game, ComputerPlays::Both, "");
        assert!(output.contains("Engine plays: Qh4#"));
        assert!(output.contains("Black wins by checkmate!"));
    }

    #[test]
    fn test_computer_sides() {
        assert!(ComputerPlays::Both.controls(Color::White));
        assert!(!ComputerPlays::None.controls(Color::Black));
        assert!(ComputerPlays::Black.controls(Color::Black));
        assert!(!ComputerPlays::Black.controls(Color::White));
    }
}
