use crate::evaluator::PositionEvaluator;
use crate::position::Position;
use crate::strategy::{SearchResult, SearchStrategy, StrategyKind};
use chess::Color;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Depth searched unless the requested depth is explicitly honoured
pub const DEFAULT_EFFECTIVE_DEPTH: u32 = 2;

/// Lookahead configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookaheadConfig {
    /// Depth handed to the constructor
    pub requested_depth: u32,
    /// Search `requested_depth` plies instead of the fixed default of two
    pub honor_requested_depth: bool,
    /// Add the evaluation of the root position to every candidate's score.
    /// The offset is identical for all moves and never changes the choice.
    pub include_root_offset: bool,
}

impl Default for LookaheadConfig {
    fn default() -> Self {
        Self {
            requested_depth: 3,
            honor_requested_depth: false,
            include_root_offset: true,
        }
    }
}

/// Unpruned fixed-depth minimax over every legal move, in generator order.
///
/// Each candidate scores `evaluate(root) + lookahead(after move)`. Nodes
/// maximize when the root side is to move and minimize otherwise.
pub struct LookaheadStrategy {
    config: LookaheadConfig,
    evaluator: Arc<PositionEvaluator>,
    nodes_explored: u64,
}

impl LookaheadStrategy {
    pub fn new(evaluator: Arc<PositionEvaluator>, config: LookaheadConfig) -> Self {
        Self {
            config,
            evaluator,
            nodes_explored: 0,
        }
    }

    /// Strategy with the default behaviour; `depth` is recorded but the
    /// search still runs at [`DEFAULT_EFFECTIVE_DEPTH`].
    pub fn with_depth(evaluator: Arc<PositionEvaluator>, depth: u32) -> Self {
        Self::new(
            evaluator,
            LookaheadConfig {
                requested_depth: depth,
                ..LookaheadConfig::default()
            },
        )
    }

    pub fn requested_depth(&self) -> u32 {
        self.config.requested_depth
    }

    /// Plies actually searched below the root, root move included
    pub fn effective_depth(&self) -> u32 {
        if self.config.honor_requested_depth {
            self.config.requested_depth.max(1)
        } else {
            DEFAULT_EFFECTIVE_DEPTH
        }
    }

    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    fn lookahead(&mut self, position: &mut Position, depth: u32, root: Color) -> f64 {
        if depth == 0 {
            return self.evaluator.score_for(position, root);
        }

        let moves = position.legal_moves();
        if moves.is_empty() {
            return self.evaluator.score_for(position, root);
        }

        let maximizing = position.side_to_move() == root;
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for mv in moves {
            position.push(mv);
            self.nodes_explored += 1;
            let score = self.lookahead(position, depth - 1, root);
            position.pop();

            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }
        best
    }
}

impl SearchStrategy for LookaheadStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Lookahead
    }

    fn search(&mut self, position: &Position) -> SearchResult {
        let start = Instant::now();
        let nodes_before = self.nodes_explored;
        let mut scratch = position.clone();
        let root = scratch.side_to_move();
        let depth = self.effective_depth();

        let root_offset = if self.config.include_root_offset {
            self.evaluator.score_for(&scratch, root)
        } else {
            0.0
        };

        let mut best_move = None;
        let mut best_score = f64::NEG_INFINITY;

        for mv in scratch.legal_moves() {
            scratch.push(mv);
            self.nodes_explored += 1;
            let long_term = self.lookahead(&mut scratch, depth - 1, root);
            scratch.pop();

            let combined = root_offset + long_term;
            if best_move.is_none() || combined > best_score {
                best_score = combined;
                best_move = Some(mv);
            }
        }

        let nodes_explored = self.nodes_explored - nodes_before;
        debug!(
            depth,
            nodes_explored,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "lookahead search finished"
        );

        SearchResult {
            best_move,
            score: best_move.map(|_| best_score),
            nodes_explored,
            time_elapsed: start.elapsed(),
        }
    }
}
