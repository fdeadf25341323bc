use crate::evaluator::PositionEvaluator;
use crate::position::Position;
use crate::strategy::{SearchResult, SearchStrategy, StrategyKind};
use crate::transposition::{CacheStats, TranspositionCache, WindowKey};
use chess::ChessMove;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Move-ordering priority of a capture
const CAPTURE_PRIORITY: i32 = 10;
/// Move-ordering priority of a checking move
const CHECK_PRIORITY: i32 = 5;

/// Alpha-beta search configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaBetaConfig {
    /// Search depth in plies, counted from the root
    pub depth: u32,
    /// Maximum transposition entries; `None` keeps every entry forever
    pub cache_capacity: Option<usize>,
}

impl Default for AlphaBetaConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            cache_capacity: None,
        }
    }
}

/// Depth-limited minimax with alpha-beta pruning, priority move ordering and
/// a window-keyed transposition cache that persists across searches.
pub struct AlphaBetaStrategy {
    config: AlphaBetaConfig,
    evaluator: Arc<PositionEvaluator>,
    cache: TranspositionCache,
    /// Nodes explored over the lifetime of this instance
    nodes_explored: u64,
}

impl AlphaBetaStrategy {
    pub fn new(evaluator: Arc<PositionEvaluator>, config: AlphaBetaConfig) -> Self {
        Self {
            cache: TranspositionCache::from_capacity(config.cache_capacity),
            config,
            evaluator,
            nodes_explored: 0,
        }
    }

    /// Unbounded-cache strategy searching `depth` plies
    pub fn with_depth(evaluator: Arc<PositionEvaluator>, depth: u32) -> Self {
        Self::new(
            evaluator,
            AlphaBetaConfig {
                depth,
                ..AlphaBetaConfig::default()
            },
        )
    }

    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Legal moves with captures first, then checks, then the rest.
    ///
    /// The sort is stable, so generator order breaks ties within a tier.
    pub fn ordered_moves(position: &Position) -> Vec<ChessMove> {
        let mut scored: Vec<(i32, ChessMove)> = position
            .legal_moves()
            .into_iter()
            .map(|mv| (Self::move_priority(position, mv), mv))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, mv)| mv).collect()
    }

    fn move_priority(position: &Position, mv: ChessMove) -> i32 {
        if position.is_capture(mv) {
            CAPTURE_PRIORITY
        } else if position.gives_check(mv) {
            CHECK_PRIORITY
        } else {
            0
        }
    }

    /// Minimax value of `position` searched `depth` plies deep inside the
    /// window `(alpha, beta)`.
    ///
    /// Values are memoised per exact window. `position` is returned to its
    /// original state before this returns.
    pub fn minimax(
        &mut self,
        position: &mut Position,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> f64 {
        let key = WindowKey::new(position.canonical_key(), depth, alpha, beta, maximizing);
        if let Some(value) = self.cache.get(&key) {
            return value;
        }

        self.nodes_explored += 1;

        if depth == 0 || position.is_game_over() {
            // The maximizing side is the side the search runs for
            let perspective = if maximizing {
                position.side_to_move()
            } else {
                !position.side_to_move()
            };
            let value = self.evaluator.score_for(position, perspective);
            self.cache.insert(key, value);
            return value;
        }

        let value = if maximizing {
            let mut max_eval = f64::NEG_INFINITY;
            for mv in Self::ordered_moves(position) {
                position.push(mv);
                let eval = self.minimax(position, depth - 1, alpha, beta, false);
                position.pop();
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = f64::INFINITY;
            for mv in Self::ordered_moves(position) {
                position.push(mv);
                let eval = self.minimax(position, depth - 1, alpha, beta, true);
                position.pop();
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            min_eval
        };

        self.cache.insert(key, value);
        value
    }
}

impl SearchStrategy for AlphaBetaStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AlphaBeta
    }

    fn search(&mut self, position: &Position) -> SearchResult {
        let start = Instant::now();
        let nodes_before = self.nodes_explored;
        let mut scratch = position.clone();
        // Depth 0 still expands the root
        let child_depth = self.config.depth.saturating_sub(1);

        let mut best_move = None;
        let mut best_value = f64::NEG_INFINITY;
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;

        for mv in Self::ordered_moves(&scratch) {
            scratch.push(mv);
            let value = self.minimax(&mut scratch, child_depth, alpha, beta, false);
            scratch.pop();

            if best_move.is_none() || value > best_value {
                best_value = value;
                best_move = Some(mv);
            }
            // Only alpha narrows at the root, so no sibling is ever pruned
            alpha = alpha.max(value);
        }

        let nodes_explored = self.nodes_explored - nodes_before;
        debug!(
            nodes_explored,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "alpha-beta search finished"
        );
        let cache = self.cache.stats();
        trace!(
            size = cache.size,
            hits = cache.hits,
            misses = cache.misses,
            hit_ratio = cache.hit_ratio(),
            "transposition cache"
        );

        SearchResult {
            best_move,
            score: best_move.map(|_| best_value),
            nodes_explored,
            time_elapsed: start.elapsed(),
        }
    }
}
