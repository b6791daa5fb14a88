//! Performance test: counts legal move paths to a fixed depth.
//!
//! Leaf counts for well-known positions are published, which makes this the
//! main cross-check for move generation and legality.

use crate::chess_move::Move;
use crate::position::Position;

/// Leaf statistics gathered by [`Perft::run`]. Everything except `nodes`
/// describes the moves made at the last ply.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Perft {
    pub nodes: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl Perft {
    pub fn new() -> Self {
        Perft::default()
    }

    /// Counts leaf positions `depth` plies below `position`.
    pub fn run(&mut self, position: &Position, depth: u32) -> u64 {
        *self = Perft::default();
        self.nodes = self.walk(position, depth);
        self.nodes
    }

    fn walk(&mut self, position: &Position, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut nodes = 0;
        for (mv, next) in position.current_player().legal_transitions() {
            if depth == 1 {
                self.record(&mv, &next);
                nodes += 1;
            } else {
                nodes += self.walk(&next, depth - 1);
            }
        }
        nodes
    }

    fn record(&mut self, mv: &Move, next: &Position) {
        if mv.is_capture() {
            self.captures += 1;
        }
        if let Move::EnPassant { .. } = mv {
            self.en_passants += 1;
        }
        if mv.is_castle() {
            self.castles += 1;
        }
        if mv.promotion().is_some() {
            self.promotions += 1;
        }
        let opponent = next.current_player();
        if opponent.in_check() {
            self.checks += 1;
            if !opponent.has_escape_moves() {
                self.checkmates += 1;
            }
        }
    }
}

/// Leaf count for `position` at `depth`.
pub fn perft(position: &Position, depth: u32) -> u64 {
    Perft::new().run(position, depth)
}

/// Leaf counts below each legal root move, in generation order.
pub fn divide(position: &Position, depth: u32) -> Vec<(Move, u64)> {
    position
        .current_player()
        .legal_transitions()
        .into_iter()
        .map(|(mv, next)| (mv, perft(&next, depth.saturating_sub(1))))
        .collect()
}
