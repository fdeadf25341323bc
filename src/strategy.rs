use crate::position::Position;
use chess::ChessMove;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The interchangeable search strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Fixed-depth full-width lookahead, used while the board is crowded
    Lookahead,
    /// Depth-limited alpha-beta, used in the middlegame
    AlphaBeta,
    /// Frontier-meeting search with a greedy fallback, used otherwise
    FrontierMeeting,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Lookahead => "fixed-depth lookahead",
            StrategyKind::AlphaBeta => "depth-limited alpha-beta",
            StrategyKind::FrontierMeeting => "frontier-meeting",
        }
    }

    /// Game stage the dispatcher assigns this strategy to
    pub fn phase(&self) -> &'static str {
        match self {
            StrategyKind::Lookahead => "opening",
            StrategyKind::AlphaBeta => "middlegame",
            StrategyKind::FrontierMeeting => "endgame",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub best_move: Option<ChessMove>,
    /// Value of the chosen move, when the strategy scores moves
    pub score: Option<f64>,
    pub nodes_explored: u64,
    pub time_elapsed: Duration,
}

/// A method of choosing a move for the side to move.
///
/// Searches explore a private copy of the position; the caller's value is
/// left untouched. A result without a move means the position has no legal
/// moves.
pub trait SearchStrategy: Send {
    fn kind(&self) -> StrategyKind;

    fn search(&mut self, position: &Position) -> SearchResult;

    fn get_best_move(&mut self, position: &Position) -> Option<ChessMove> {
        self.search(position).best_move
    }
}
