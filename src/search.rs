use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::chess_move::Move;
use crate::evaluation::evaluate;
use crate::moveorder::MoveOrderer;
use crate::position::{Color, Position};
use crate::transposition::TranspositionTable;

pub const DEFAULT_DEPTH: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    depth: u32, // plies to search, never below 1
}

impl SearchConfig {
    pub fn new(depth: u32) -> Self {
        SearchConfig { depth: depth.max(1) }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig::new(DEFAULT_DEPTH)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub evaluations: u64,
    pub cache_hits: u64,
    pub collisions: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// `None` when the side to move has no legal move
    pub best_move: Option<Move>,
    pub score: i32,
    pub stats: SearchStats,
}

/// Fixed-depth alpha-beta search. White maximizes, Black minimizes.
#[derive(Debug, Clone, Default)]
pub struct Search {
    config: SearchConfig,
    table: TranspositionTable,
    move_orderer: MoveOrderer,
    nodes_searched: u64,
    evaluations: u64,
}

impl Search {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            ..Search::default()
        }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.config = SearchConfig::new(depth);
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    /// Find the best move for the side to move in `position`
    pub fn find_best_move(&mut self, position: &Position) -> SearchOutcome {
        let start_time = Instant::now();
        let depth = self.config.depth;
        let color = position.active_color();
        self.nodes_searched = 0;
        self.evaluations = 0;
        self.table.new_search();
        let evaluations_before = self.move_orderer.evaluations();

        info!(depth, side = %color, "search started");

        let mut alpha = i32::MIN;
        let mut beta = i32::MAX;
        let ordered = self.move_orderer.order_moves(position, &mut self.table);
        let mut best_move = ordered.first().map(|(mv, _)| *mv);

        for (mv, next) in &ordered {
            let score = match color {
                Color::White => self.minimize(next, depth - 1, alpha, beta),
                Color::Black => self.maximize(next, depth - 1, alpha, beta),
            };
            debug!(mv = %mv, score, "root move searched");

            let improved = match color {
                Color::White => score > alpha,
                Color::Black => score < beta,
            };
            if !improved {
                continue;
            }
            match color {
                Color::White => alpha = score,
                Color::Black => beta = score,
            }
            best_move = Some(*mv);
            if next.current_player().in_checkmate() {
                break;
            }
        }

        let score = match (best_move, color) {
            (None, _) => self.leaf_score(position, depth, i32::MIN, i32::MAX),
            (Some(_), Color::White) => alpha,
            (Some(_), Color::Black) => beta,
        };

        let stats = SearchStats {
            nodes: self.nodes_searched,
            evaluations: self.evaluations + self.move_orderer.evaluations() - evaluations_before,
            cache_hits: self.table.hits(),
            collisions: self.table.collisions(),
            elapsed: start_time.elapsed(),
        };
        info!(
            depth,
            best = %best_move.map(|mv| mv.to_string()).unwrap_or_else(|| "none".into()),
            score,
            nodes = stats.nodes,
            cache_hits = stats.cache_hits,
            collisions = stats.collisions,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "search finished"
        );

        SearchOutcome { best_move, score, stats }
    }

    /// Best score White can force, kept within `[alpha, beta]`.
    pub fn maximize(&mut self, position: &Position, depth: u32, alpha: i32, beta: i32) -> i32 {
        self.nodes_searched += 1;
        if depth == 0 || is_game_over(position) {
            return self.leaf_score(position, depth, alpha, beta);
        }

        let mut highest = alpha;
        for (_, next) in self.move_orderer.order_moves(position, &mut self.table) {
            let score = self.minimize(&next, depth - 1, highest, beta);
            highest = highest.max(score);
            if highest >= beta {
                return beta;
            }
        }
        highest
    }

    /// Best score Black can force, kept within `[alpha, beta]`.
    pub fn minimize(&mut self, position: &Position, depth: u32, alpha: i32, beta: i32) -> i32 {
        self.nodes_searched += 1;
        if depth == 0 || is_game_over(position) {
            return self.leaf_score(position, depth, alpha, beta);
        }

        let mut lowest = beta;
        for (_, next) in self.move_orderer.order_moves(position, &mut self.table) {
            let score = self.maximize(&next, depth - 1, alpha, lowest);
            lowest = lowest.min(score);
            if lowest <= alpha {
                return alpha;
            }
        }
        lowest
    }

    fn leaf_score(&mut self, position: &Position, depth: u32, alpha: i32, beta: i32) -> i32 {
        let check = position.check_key();
        let value = match self.table.probe(position.hash(), check, depth) {
            Some(entry) => entry.value,
            None => {
                self.evaluations += 1;
                let value = evaluate(position, depth);
                self.table.store(position.hash(), check, depth, value);
                value
            }
        };
        value.max(alpha).min(beta)
    }
}

/// Checkmate or stalemate for the side to move.
fn is_game_over(position: &Position) -> bool {
    !position.current_player().has_escape_moves()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHOLARS_MATE: &str =
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";

    fn best(fen: &str, depth: u32) -> SearchOutcome {
        let position = Position::read_fen(fen).unwrap();
        Search::new(SearchConfig::new(depth)).find_best_move(&position)
    }

    fn coordinate(outcome: &SearchOutcome) -> String {
        outcome.best_move.map(|mv| mv.coordinate()).unwrap_or_default()
    }

    #[test]
    fn test_mate_in_one_for_black() {
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2";
        for depth in [1, 2] {
            let outcome = best(fen, depth);
            assert_eq!(coordinate(&outcome), "d8h4");
            assert!(outcome.score < -10_000);
        }
    }

    #[test]
    fn test_mate_in_one_for_white() {
        let outcome = best(SCHOLARS_MATE, 1);
        assert_eq!(coordinate(&outcome), "h5f7");
        assert!(outcome.score > 10_000);
    }

    #[test]
    fn test_find_capture() {
        let outcome = best("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", 2);
        assert_eq!(coordinate(&outcome), "d1d5");
    }

    #[test]
    fn test_no_legal_moves_yields_no_move() {
        let outcome = best("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3);
        assert!(outcome.best_move.is_none());
    }

    #[test]
    fn test_search_depth() {
        let position = Position::new();
        let mut search = Search::new(SearchConfig::new(2));
        let outcome = search.find_best_move(&position);
        let mv = outcome.best_move.unwrap();
        assert!(position.current_player().make_move(&mv).status().is_done());
        assert!(outcome.stats.nodes > 20);
        assert!(outcome.stats.evaluations > 0);
    }

    #[test]
    fn test_depth_is_clamped_to_one() {
        assert_eq!(SearchConfig::new(0).depth(), 1);
        let mut search = Search::new(SearchConfig::default());
        assert_eq!(search.config().depth(), DEFAULT_DEPTH);
        search.set_depth(0);
        assert_eq!(search.config().depth(), 1);
        assert!(search.find_best_move(&Position::new()).best_move.is_some());

        let outcome = Search::new(SearchConfig::new(0)).find_best_move(&Position::new());
        assert!(outcome.best_move.is_some());
    }

    #[test]
    fn test_results_stay_within_the_window() {
        let positions = [
            Position::new(),
            Position::read_fen(SCHOLARS_MATE).unwrap(),
            Position::read_fen("4k3/8/8/3q4/8/8/8/3RK3 b - - 0 1").unwrap(),
        ];
        let windows = [(i32::MIN, i32::MAX), (-50, 50), (0, 0), (100, 20_000), (-20_000, -100)];
        let mut search = Search::new(SearchConfig::new(2));
        for position in &positions {
            for &(alpha, beta) in &windows {
                for depth in 0..=2 {
                    let high = search.maximize(position, depth, alpha, beta);
                    let low = search.minimize(position, depth, alpha, beta);
                    assert!(
                        alpha <= high && high <= beta,
                        "maximize gave {high} for [{alpha}, {beta}]"
                    );
                    assert!(
                        alpha <= low && low <= beta,
                        "minimize gave {low} for [{alpha}, {beta}]"
                    );
                }
            }
        }
    }
}
