use crate::chess_move::Move;
use crate::evaluation::evaluate;
use crate::position::{Color, Position};
use crate::transposition::TranspositionTable;

/// Depth tag for ordering evaluations. Horizon leaves use the same tag, so
/// the two share cache entries.
pub const ORDERING_DEPTH: u32 = 0;

#[derive(Clone, Debug, Default)]
pub struct MoveOrderer {
    evaluations: u64, // scores computed rather than read from the cache
}

impl MoveOrderer {
    pub fn new() -> Self {
        MoveOrderer::default()
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Plays every candidate move of the side to move, drops those that do
    /// not complete, and sorts the rest by the static score of the position
    /// they reach: best first for White, lowest first for Black. Ties keep
    /// generation order.
    pub fn order_moves(
        &mut self,
        position: &Position,
        table: &mut TranspositionTable,
    ) -> Vec<(Move, Position)> {
        let mut scored: Vec<(Move, Position, i32)> = position
            .current_player()
            .legal_transitions()
            .into_iter()
            .map(|(mv, next)| {
                let score = self.score_move(&next, table);
                (mv, next, score)
            })
            .collect();

        match position.active_color() {
            Color::White => scored.sort_by(|a, b| b.2.cmp(&a.2)),
            Color::Black => scored.sort_by(|a, b| a.2.cmp(&b.2)),
        }

        scored.into_iter().map(|(mv, next, _)| (mv, next)).collect()
    }

    fn score_move(&mut self, next: &Position, table: &mut TranspositionTable) -> i32 {
        let check = next.check_key();
        if let Some(entry) = table.probe(next.hash(), check, ORDERING_DEPTH) {
            return entry.value;
        }
        self.evaluations += 1;
        let score = evaluate(next, ORDERING_DEPTH);
        table.store(next.hash(), check, ORDERING_DEPTH, score);
        score
    }
}
