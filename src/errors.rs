use thiserror::Error;

/// Error types for the move-selection engine.
///
/// Search itself never fails; these only surface at the edges: parsing
/// positions, applying caller-supplied moves and loading configuration.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid chess position (unparseable or inconsistent FEN)
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// A move that is not legal in the position it was applied to
    #[error("Illegal move {mv} in position {fen}")]
    IllegalMove { mv: String, fen: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation error with context
    #[error("Validation failed for field '{field}': got '{value}', expected '{expected}'")]
    Validation {
        field: String,
        value: String,
        expected: String,
    },

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Integer field failed to parse
    #[error("Invalid integer: {0}")]
    InvalidNumber(#[from] std::num::ParseIntError),
}

// Convenience type alias
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Build a validation error from displayable parts
    pub fn validation(
        field: impl Into<String>,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        EngineError::Validation {
            field: field.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = EngineError::InvalidPosition("bad fen".to_string());
        assert_eq!(error.to_string(), "Invalid position: bad fen");

        let error = EngineError::validation("alpha_beta.depth", 0, ">= 1");
        assert_eq!(
            error.to_string(),
            "Validation failed for field 'alpha_beta.depth': got '0', expected '>= 1'"
        );
    }

    #[test]
    fn test_error_conversion() {
        let parse_error = "x".parse::<u32>().unwrap_err();
        let error: EngineError = parse_error.into();
        assert!(matches!(error, EngineError::InvalidNumber(_)));

        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: EngineError = io_error.into();
        assert!(error.to_string().starts_with("I/O error"));
    }
}
