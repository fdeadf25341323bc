//! # Chess Phase Engine
//!
//! Move selection for chess with several interchangeable search strategies,
//! chosen automatically from how far the game has progressed.
//!
//! ## Features
//!
//! - **Position Evaluator**: material, center control, pawn structure, king
//!   safety, mobility and threats, scored for the side to move
//! - **Depth-Limited Alpha-Beta**: captures-then-checks move ordering and a
//!   window-keyed transposition cache that persists across searches
//! - **Fixed-Depth Lookahead**: unpruned full-width minimax for crowded boards
//! - **Frontier-Meeting Search**: two breadth-first frontiers with a greedy
//!   one-ply fallback
//! - **Phase Dispatcher**: picks a strategy per call from piece and move counts
//!
//! ## Quick Start
//!
//! ```rust
//! use chess_phase_engine::{EngineConfig, PhaseDispatcher, Position};
//!
//! let mut dispatcher = PhaseDispatcher::new(&EngineConfig::default());
//! let position = Position::new();
//!
//! let strategy = dispatcher.choose_strategy(&position);
//! println!("Searching with {}", strategy);
//!
//! if let Some(best) = dispatcher.get_best_move(&position) {
//!     println!("Best move: {}", best);
//! }
//! ```
//!
//! Searches are synchronous and single-threaded: a call blocks until its
//! whole tree has been explored. Every strategy is `Send`, so a caller that
//! needs a responsive front end can run the dispatcher on a worker thread.

// Core modules
pub mod config;
pub mod errors;
pub mod position;

// Evaluation and search
pub mod alpha_beta;
pub mod dispatcher;
pub mod evaluator;
pub mod frontier;
pub mod lookahead;
pub mod strategy;
pub mod transposition;

// Re-export commonly used types
pub use alpha_beta::{AlphaBetaConfig, AlphaBetaStrategy};
pub use config::EngineConfig;
pub use dispatcher::{DispatchResult, PhaseDispatcher, PhaseThresholds};
pub use errors::{EngineError, Result};
pub use evaluator::{
    EvaluationBreakdown, EvaluationConfig, EvaluationWeights, PieceValues, PositionEvaluator,
    ScoreOrientation,
};
pub use frontier::{FrontierConfig, FrontierMeetingStrategy};
pub use lookahead::{LookaheadConfig, LookaheadStrategy, DEFAULT_EFFECTIVE_DEPTH};
pub use position::{Position, Termination};
pub use strategy::{SearchResult, SearchStrategy, StrategyKind};
pub use transposition::{CacheStats, TranspositionCache, WindowKey};
