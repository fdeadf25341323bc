use crate::alpha_beta::AlphaBetaStrategy;
use crate::config::EngineConfig;
use crate::evaluator::PositionEvaluator;
use crate::frontier::FrontierMeetingStrategy;
use crate::lookahead::LookaheadStrategy;
use crate::position::Position;
use crate::strategy::{SearchResult, SearchStrategy, StrategyKind};
use chess::ChessMove;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Piece and move counts that separate the game phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseThresholds {
    /// Lookahead is used from this many occupied squares upwards
    pub opening_min_pieces: u32,
    /// Lookahead also requires fewer legal moves than this. The default is
    /// far above any legal chess position and never rejects one.
    pub opening_max_moves: usize,
    pub middlegame_min_pieces: u32,
    pub middlegame_max_pieces: u32,
    /// Alpha-beta requires fewer legal moves than this
    pub middlegame_max_moves: usize,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            opening_min_pieces: 25,
            opening_max_moves: 1_000_000,
            middlegame_min_pieces: 20,
            middlegame_max_pieces: 24,
            middlegame_max_moves: 50,
        }
    }
}

impl PhaseThresholds {
    pub fn classify(&self, piece_count: u32, move_count: usize) -> StrategyKind {
        if piece_count >= self.opening_min_pieces && move_count < self.opening_max_moves {
            StrategyKind::Lookahead
        } else if (self.middlegame_min_pieces..=self.middlegame_max_pieces).contains(&piece_count)
            && move_count < self.middlegame_max_moves
        {
            StrategyKind::AlphaBeta
        } else {
            StrategyKind::FrontierMeeting
        }
    }
}

/// Result of a dispatched search
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub strategy: StrategyKind,
    pub result: SearchResult,
}

/// Picks a search strategy per call from the number of pieces on the board
/// and the number of legal moves, then delegates to it.
///
/// Selection holds no state; the strategies keep their own (the alpha-beta
/// transposition cache lives as long as the dispatcher).
pub struct PhaseDispatcher {
    evaluator: Arc<PositionEvaluator>,
    thresholds: PhaseThresholds,
    lookahead: LookaheadStrategy,
    alpha_beta: AlphaBetaStrategy,
    frontier: FrontierMeetingStrategy,
}

impl PhaseDispatcher {
    /// Build all three strategies around one shared evaluator
    pub fn new(config: &EngineConfig) -> Self {
        let evaluator = Arc::new(PositionEvaluator::new(config.evaluation));
        Self {
            lookahead: LookaheadStrategy::new(evaluator.clone(), config.lookahead),
            alpha_beta: AlphaBetaStrategy::new(evaluator.clone(), config.alpha_beta),
            frontier: FrontierMeetingStrategy::new(evaluator.clone(), config.frontier),
            thresholds: config.phases,
            evaluator,
        }
    }

    pub fn evaluator(&self) -> &Arc<PositionEvaluator> {
        &self.evaluator
    }

    pub fn alpha_beta(&self) -> &AlphaBetaStrategy {
        &self.alpha_beta
    }

    pub fn choose_strategy(&self, position: &Position) -> StrategyKind {
        self.thresholds
            .classify(position.piece_count(), position.legal_move_count())
    }

    pub fn strategy_mut(&mut self, kind: StrategyKind) -> &mut dyn SearchStrategy {
        match kind {
            StrategyKind::Lookahead => &mut self.lookahead,
            StrategyKind::AlphaBeta => &mut self.alpha_beta,
            StrategyKind::FrontierMeeting => &mut self.frontier,
        }
    }

    pub fn search(&mut self, position: &Position) -> DispatchResult {
        let strategy = self.choose_strategy(position);
        info!(
            strategy = %strategy,
            phase = strategy.phase(),
            pieces = position.piece_count(),
            "selected search strategy"
        );
        let result = self.strategy_mut(strategy).search(position);
        DispatchResult { strategy, result }
    }

    /// Search with `forced` when given, otherwise dispatch by phase
    pub fn search_with(
        &mut self,
        position: &Position,
        forced: Option<StrategyKind>,
    ) -> DispatchResult {
        match forced {
            Some(strategy) => {
                let result = self.strategy_mut(strategy).search(position);
                DispatchResult { strategy, result }
            }
            None => self.search(position),
        }
    }

    pub fn get_best_move(&mut self, position: &Position) -> Option<ChessMove> {
        self.search(position).result.best_move
    }
}

impl Default for PhaseDispatcher {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
