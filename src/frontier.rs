//! Two-frontier meeting search with a greedy one-ply fallback.
//!
//! Both frontiers are seeded with the current position; there is no known
//! set of goal positions to anchor the backward side. Each round dequeues one
//! node per frontier, expands every legal move and stops as soon as a reached
//! position is already in the other frontier's visited map. Because the two
//! frontiers cover the same space, a meeting usually happens in the first
//! round.

use crate::evaluator::PositionEvaluator;
use crate::position::Position;
use crate::strategy::{SearchResult, SearchStrategy, StrategyKind};
use chess::ChessMove;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Frontier-meeting configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontierConfig {
    /// Nodes at this distance from the start are not expanded
    pub max_depth: u32,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self { max_depth: 2 }
    }
}

/// Canonical key -> root move that first reached it (`None` for the start)
type VisitedMap = HashMap<String, Option<ChessMove>>;

struct FrontierNode {
    position: Position,
    /// Move from the start position this node descends from
    origin: Option<ChessMove>,
    depth: u32,
}

/// A reached position that the other frontier has already visited
struct Meeting {
    key: String,
    origin: ChessMove,
}

/// Forward frontier's root move for a position the backward side reached.
/// The start position has none, which ends the search without a move.
fn forward_origin(visited_forward: &VisitedMap, key: &str) -> Option<ChessMove> {
    visited_forward.get(key).copied().flatten()
}

pub struct FrontierMeetingStrategy {
    config: FrontierConfig,
    evaluator: Arc<PositionEvaluator>,
    nodes_explored: u64,
}

impl FrontierMeetingStrategy {
    pub fn new(evaluator: Arc<PositionEvaluator>, config: FrontierConfig) -> Self {
        Self {
            config,
            evaluator,
            nodes_explored: 0,
        }
    }

    pub fn with_depth(evaluator: Arc<PositionEvaluator>, max_depth: u32) -> Self {
        Self::new(evaluator, FrontierConfig { max_depth })
    }

    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    /// Run both frontiers until they meet or run dry.
    ///
    /// Every returned move is a legal move of `position`.
    pub fn frontier_search(&mut self, position: &Position) -> Option<ChessMove> {
        let start_key = position.canonical_key();
        let seed = || FrontierNode {
            position: position.clone(),
            origin: None,
            depth: 0,
        };

        let mut forward = VecDeque::from([seed()]);
        let mut backward = VecDeque::from([seed()]);
        let mut visited_forward = VisitedMap::from([(start_key.clone(), None)]);
        let mut visited_backward = VisitedMap::from([(start_key, None)]);

        while !forward.is_empty() || !backward.is_empty() {
            if let Some(node) = forward.pop_front() {
                if let Some(meeting) =
                    self.expand(node, &mut forward, &mut visited_forward, &visited_backward)
                {
                    return Some(meeting.origin);
                }
            }

            if let Some(node) = backward.pop_front() {
                if let Some(meeting) =
                    self.expand(node, &mut backward, &mut visited_backward, &visited_forward)
                {
                    return forward_origin(&visited_forward, &meeting.key);
                }
            }
        }

        None
    }

    fn expand(
        &mut self,
        node: FrontierNode,
        queue: &mut VecDeque<FrontierNode>,
        visited: &mut VisitedMap,
        other: &VisitedMap,
    ) -> Option<Meeting> {
        if node.depth >= self.config.max_depth {
            return None;
        }

        let mut current = node.position;
        for mv in current.legal_moves() {
            current.push(mv);
            self.nodes_explored += 1;

            let key = current.canonical_key();
            let origin = node.origin.unwrap_or(mv);

            if other.contains_key(&key) {
                return Some(Meeting { key, origin });
            }

            if !visited.contains_key(&key) {
                queue.push_back(FrontierNode {
                    position: current.clone(),
                    origin: Some(origin),
                    depth: node.depth + 1,
                });
                visited.insert(key, Some(origin));
            }

            current.pop();
        }

        None
    }

    /// Legal move whose resulting position evaluates best for the side to
    /// move; the earliest move wins ties.
    pub fn greedy_move(&self, position: &Position) -> Option<(ChessMove, f64)> {
        let mut scratch = position.clone();
        let root = scratch.side_to_move();

        let mut best: Option<(ChessMove, f64)> = None;
        for mv in scratch.legal_moves() {
            scratch.push(mv);
            let score = self.evaluator.score_for(&scratch, root);
            scratch.pop();

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
        }
        best
    }
}

impl SearchStrategy for FrontierMeetingStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FrontierMeeting
    }

    fn search(&mut self, position: &Position) -> SearchResult {
        let start = Instant::now();
        let nodes_before = self.nodes_explored;

        let (best_move, score) = match self.frontier_search(position) {
            Some(mv) => (Some(mv), None),
            None => {
                debug!("frontiers did not meet, falling back to greedy selection");
                match self.greedy_move(position) {
                    Some((mv, score)) => (Some(mv), Some(score)),
                    None => (None, None),
                }
            }
        };

        let nodes_explored = self.nodes_explored - nodes_before;
        debug!(
            nodes_explored,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "frontier-meeting search finished"
        );

        SearchResult {
            best_move,
            score,
            nodes_explored,
            time_elapsed: start.elapsed(),
        }
    }
}
