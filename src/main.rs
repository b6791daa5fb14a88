//! Text-mode front end: play against the engine in a terminal.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use botvinnik::position::STARTING_FEN;
use botvinnik::search::{SearchConfig, DEFAULT_DEPTH};
use botvinnik::ui::{ChessUI, ComputerPlays};
use botvinnik::Game;

#[derive(Parser, Debug)]
#[command(
    name = "botvinnik",
    version,
    about = "Play chess against a fixed-depth alpha-beta engine"
)]
struct Args {
    /// Search depth in plies
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Starting position in FEN
    #[arg(short, long, default_value = STARTING_FEN)]
    fen: String,

    /// Sides played by the engine
    #[arg(short, long, value_enum, default_value_t = ComputerPlays::Black)]
    computer: ComputerPlays,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let game = match Game::from_fen(&args.fen) {
        Ok(game) => game,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let result = ChessUI::new(game, SearchConfig::new(args.depth), args.computer)
        .and_then(|mut ui| ui.play_game(io::stdin().lock(), io::stdout().lock()));
    if let Err(e) = result {
        error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
