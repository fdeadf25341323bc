use crate::alpha_beta::AlphaBetaConfig;
use crate::dispatcher::PhaseThresholds;
use crate::errors::{EngineError, Result};
use crate::evaluator::EvaluationConfig;
use crate::frontier::FrontierConfig;
use crate::lookahead::LookaheadConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete engine configuration.
///
/// Every section falls back to its defaults when missing from a JSON file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub evaluation: EvaluationConfig,
    pub alpha_beta: AlphaBetaConfig,
    pub lookahead: LookaheadConfig,
    pub frontier: FrontierConfig,
    pub phases: PhaseThresholds,
}

impl EngineConfig {
    /// Shallow searches for quick answers
    pub fn fast() -> Self {
        Self {
            alpha_beta: AlphaBetaConfig {
                depth: 2,
                cache_capacity: Some(100_000),
            },
            frontier: FrontierConfig { max_depth: 1 },
            ..Self::default()
        }
    }

    /// Deeper alpha-beta and a lookahead that honours its requested depth
    pub fn thorough() -> Self {
        Self {
            alpha_beta: AlphaBetaConfig {
                depth: 5,
                cache_capacity: None,
            },
            lookahead: LookaheadConfig {
                requested_depth: 3,
                honor_requested_depth: true,
                include_root_offset: true,
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.alpha_beta.depth == 0 {
            return Err(EngineError::validation("alpha_beta.depth", 0, ">= 1"));
        }
        if self.alpha_beta.cache_capacity == Some(0) {
            return Err(EngineError::validation(
                "alpha_beta.cache_capacity",
                0,
                ">= 1, or null for an unbounded cache",
            ));
        }
        if self.lookahead.requested_depth == 0 {
            return Err(EngineError::validation("lookahead.requested_depth", 0, ">= 1"));
        }
        if self.phases.middlegame_min_pieces > self.phases.middlegame_max_pieces {
            return Err(EngineError::Configuration(format!(
                "middlegame piece range {}..={} is empty",
                self.phases.middlegame_min_pieces, self.phases.middlegame_max_pieces
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
