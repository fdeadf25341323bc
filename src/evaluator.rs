//! Static position evaluation.
//!
//! Six raw terms are computed from Black's point of view (Black-favourable
//! contributions positive, White-favourable negative), weighted, summed, and
//! then multiplied by +1 when Black is to move or -1 when White is to move.
//! The result is relative to the side to move in the evaluated position.

use crate::position::Position;
use chess::{Color, Piece, Square, ALL_SQUARES};
use serde::{Deserialize, Serialize};

const CENTER_SQUARES: [Square; 4] = [Square::E4, Square::D4, Square::E5, Square::D5];

const WIDER_CENTER: [Square; 12] = [
    Square::C3,
    Square::D3,
    Square::E3,
    Square::F3,
    Square::C4,
    Square::F4,
    Square::C5,
    Square::F5,
    Square::C6,
    Square::D6,
    Square::E6,
    Square::F6,
];

/// Raw king-safety score for a checkmate on the board
const CHECKMATE_SCORE: f64 = 10_000.0;

/// Per-piece material values in pawn units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceValues {
    pub pawn: f64,
    pub knight: f64,
    pub bishop: f64,
    pub rook: f64,
    pub queen: f64,
    /// The king cannot be captured; mate is scored by king safety instead
    pub king: f64,
}

impl Default for PieceValues {
    fn default() -> Self {
        Self {
            pawn: 1.0,
            knight: 3.0,
            bishop: 3.5,
            rook: 5.0,
            queen: 9.0,
            king: 0.0,
        }
    }
}

impl PieceValues {
    pub fn value(&self, piece: Piece) -> f64 {
        match piece {
            Piece::Pawn => self.pawn,
            Piece::Knight => self.knight,
            Piece::Bishop => self.bishop,
            Piece::Rook => self.rook,
            Piece::Queen => self.queen,
            Piece::King => self.king,
        }
    }
}

/// Multipliers applied to each raw term
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationWeights {
    pub material: f64,
    pub center_control: f64,
    pub pawn_structure: f64,
    pub king_safety: f64,
    pub piece_activity: f64,
    pub threats: f64,
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self {
            material: 4.0,
            center_control: 3.0,
            pawn_structure: 2.0,
            king_safety: 5.0,
            piece_activity: 1.0,
            threats: 3.0,
        }
    }
}

/// How searches turn a side-to-move-relative evaluation into a value for
/// the searching side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOrientation {
    /// Negate scores of positions where the opponent of the searching side
    /// is to move.
    #[default]
    RootRelative,
    /// Use the raw side-to-move-relative score at every node.
    SideToMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub piece_values: PieceValues,
    pub weights: EvaluationWeights,
    pub orientation: ScoreOrientation,
}

/// Every raw (unweighted) term of one evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationBreakdown {
    pub material: f64,
    pub center_control: f64,
    pub pawn_structure: f64,
    pub king_safety: f64,
    pub piece_activity: f64,
    pub threats: f64,
    /// +1 with Black to move, -1 with White to move
    pub multiplier: f64,
    pub total: f64,
}

/// Stateless scoring function shared by every search strategy.
#[derive(Debug, Clone, Default)]
pub struct PositionEvaluator {
    config: EvaluationConfig,
}

impl PositionEvaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    /// Score relative to the side to move in `position`
    pub fn evaluate(&self, position: &Position) -> f64 {
        self.breakdown(position).total
    }

    /// Score for a search run on behalf of `perspective`
    pub fn score_for(&self, position: &Position, perspective: Color) -> f64 {
        let score = self.evaluate(position);
        match self.config.orientation {
            ScoreOrientation::RootRelative if position.side_to_move() != perspective => -score,
            _ => score,
        }
    }

    pub fn breakdown(&self, position: &Position) -> EvaluationBreakdown {
        let weights = &self.config.weights;
        let multiplier = match position.side_to_move() {
            Color::Black => 1.0,
            Color::White => -1.0,
        };

        let material = self.material_balance(position);
        let center_control = self.center_control(position);
        let pawn_structure = self.pawn_structure(position);
        let king_safety = self.king_safety(position);
        let piece_activity = self.piece_activity(position);
        let threats = self.threats(position);

        let mut score = 0.0;
        score += material * weights.material;
        score += center_control * weights.center_control;
        score += pawn_structure * weights.pawn_structure;
        score += king_safety * weights.king_safety;
        score += piece_activity * weights.piece_activity;
        score += threats * weights.threats;

        EvaluationBreakdown {
            material,
            center_control,
            pawn_structure,
            king_safety,
            piece_activity,
            threats,
            multiplier,
            total: score * multiplier,
        }
    }

    fn material_balance(&self, position: &Position) -> f64 {
        let mut score = 0.0;
        for square in ALL_SQUARES {
            if let Some((piece, color)) = position.piece_at(square) {
                let value = self.config.piece_values.value(piece);
                match color {
                    Color::White => score -= value,
                    Color::Black => score += value,
                }
            }
        }
        score
    }

    fn center_control(&self, position: &Position) -> f64 {
        let occupant_score = |squares: &[Square], weight: f64| -> f64 {
            squares
                .iter()
                .filter_map(|&square| position.piece_at(square))
                .map(|(_, color)| if color == Color::Black { weight } else { -weight })
                .sum()
        };
        occupant_score(&CENTER_SQUARES, 0.5) + occupant_score(&WIDER_CENTER, 0.25)
    }

    /// Doubled and isolated pawns, with both colours pooled per file
    fn pawn_structure(&self, position: &Position) -> f64 {
        let mut pawns_per_file = [0u32; 8];
        for color in [Color::Black, Color::White] {
            for square in position.pieces(Piece::Pawn, color) {
                pawns_per_file[square.get_file().to_index()] += 1;
            }
        }

        let mut score = 0.0;
        for (file, &count) in pawns_per_file.iter().enumerate() {
            if count > 1 {
                score -= 0.5;
            }
            if count == 1 {
                let left = file.checked_sub(1).map_or(0, |f| pawns_per_file[f]);
                let right = pawns_per_file.get(file + 1).copied().unwrap_or(0);
                if left == 0 && right == 0 {
                    score -= 0.5;
                }
            }
        }
        score
    }

    fn king_safety(&self, position: &Position) -> f64 {
        if !position.is_checkmate() {
            return 0.0;
        }
        match position.side_to_move() {
            Color::White => CHECKMATE_SCORE,
            Color::Black => -CHECKMATE_SCORE,
        }
    }

    /// Raw mobility: 0.1 per legal move, signed by the mover's colour
    fn piece_activity(&self, position: &Position) -> f64 {
        let board = position.board();
        position
            .legal_moves()
            .into_iter()
            .map(|mv| match board.color_on(mv.get_source()) {
                Some(Color::Black) => 0.1,
                _ => -0.1,
            })
            .sum()
    }

    /// Attacked pieces weighted by attacker count and victim value
    fn threats(&self, position: &Position) -> f64 {
        let mut score = 0.0;
        for square in ALL_SQUARES {
            let Some((piece, color)) = position.piece_at(square) else {
                continue;
            };
            let value = self.config.piece_values.value(piece);
            match color {
                Color::White => {
                    score += position.attacker_count(square, Color::Black) as f64 * value;
                }
                Color::Black => {
                    score -= position.attacker_count(square, Color::White) as f64 * value;
                }
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn only(weights: EvaluationWeights) -> PositionEvaluator {
        PositionEvaluator::new(EvaluationConfig {
            weights,
            ..EvaluationConfig::default()
        })
    }

    fn zero_weights() -> EvaluationWeights {
        EvaluationWeights {
            material: 0.0,
            center_control: 0.0,
            pawn_structure: 0.0,
            king_safety: 0.0,
            piece_activity: 0.0,
            threats: 0.0,
        }
    }

    #[test]
    fn test_start_position_is_balanced() {
        let evaluator = PositionEvaluator::default();
        let breakdown = evaluator.breakdown(&Position::new());
        assert_eq!(breakdown.material, 0.0);
        assert_eq!(breakdown.center_control, 0.0);
        // Every file holds one white and one black pawn: eight doubled files
        assert!((breakdown.pawn_structure + 4.0).abs() < EPSILON);
        assert_eq!(breakdown.king_safety, 0.0);
        // Twenty white moves, white to move
        assert!((breakdown.piece_activity + 2.0).abs() < EPSILON);
        assert_eq!(breakdown.threats, 0.0);
        assert_eq!(breakdown.multiplier, -1.0);

        let expected = (-4.0 * 2.0 + -2.0 * 1.0) * -1.0;
        assert!((breakdown.total - expected).abs() < EPSILON);
    }

    #[test]
    fn test_material_is_side_to_move_relative() {
        let evaluator = only(EvaluationWeights {
            material: 4.0,
            ..zero_weights()
        });
        // White is a rook up
        let white_to_move = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let black_to_move = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
        assert!((evaluator.evaluate(&white_to_move) - 20.0).abs() < EPSILON);
        assert!((evaluator.evaluate(&black_to_move) + 20.0).abs() < EPSILON);
    }

    #[test]
    fn test_center_control() {
        let evaluator = PositionEvaluator::default();
        // White knight on e4 (center), black knight on c6 (wider center)
        let position = Position::from_fen("4k3/8/2n5/8/4N3/8/8/4K3 w - - 0 1").unwrap();
        let breakdown = evaluator.breakdown(&position);
        assert!((breakdown.center_control - (-0.5 + 0.25)).abs() < EPSILON);
    }

    #[test]
    fn test_pawn_structure_pools_colours() {
        let evaluator = PositionEvaluator::default();
        // a-file: white + black pawn (doubled), e-file: lone white pawn (isolated)
        let position = Position::from_fen("4k3/p7/8/8/8/8/P3P3/4K3 w - - 0 1").unwrap();
        let breakdown = evaluator.breakdown(&position);
        assert!((breakdown.pawn_structure + 1.0).abs() < EPSILON);

        // Neighbouring files shield each other from the isolated penalty
        let position = Position::from_fen("4k3/8/8/8/8/8/3PP3/4K3 w - - 0 1").unwrap();
        assert_eq!(evaluator.breakdown(&position).pawn_structure, 0.0);
    }

    #[test]
    fn test_checkmate_dominates() {
        let evaluator = PositionEvaluator::default();
        let white_mated =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let breakdown = evaluator.breakdown(&white_mated);
        assert_eq!(breakdown.king_safety, CHECKMATE_SCORE);
        assert!(breakdown.total < -40_000.0);

        let black_mated = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        let breakdown = evaluator.breakdown(&black_mated);
        assert_eq!(breakdown.king_safety, -CHECKMATE_SCORE);
        assert!(breakdown.total < -40_000.0);
    }

    #[test]
    fn test_threats_count_every_attacker() {
        let evaluator = PositionEvaluator::default();
        // Black queen on d5 attacked by the white rook d1 and knight c3
        let position = Position::from_fen("6k1/8/8/3q4/8/2N5/8/3R2K1 b - - 0 1").unwrap();
        let breakdown = evaluator.breakdown(&position);
        // -2 * 9 for the queen, +5 for the rook the queen hits down the d-file
        assert!((breakdown.threats - (-18.0 + 5.0)).abs() < EPSILON);
    }

    #[test]
    fn test_score_for_orientation() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();

        let root_relative = PositionEvaluator::default();
        let raw = root_relative.evaluate(&position);
        assert_eq!(root_relative.score_for(&position, Color::Black), raw);
        assert_eq!(root_relative.score_for(&position, Color::White), -raw);

        let side_to_move = PositionEvaluator::new(EvaluationConfig {
            orientation: ScoreOrientation::SideToMove,
            ..EvaluationConfig::default()
        });
        assert_eq!(side_to_move.score_for(&position, Color::White), raw);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let evaluator = PositionEvaluator::default();
        let position = Position::from_fen(
            "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R b KQkq - 0 4",
        )
        .unwrap();
        assert_eq!(evaluator.evaluate(&position), evaluator.evaluate(&position));
    }
}
