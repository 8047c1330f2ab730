//! Error types for confetti

use thiserror::Error;

/// The main error type for confetti operations
#[derive(Debug, Error)]
pub enum ConfettiError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfettiError {
    /// Shorthand for an `InvalidConfiguration` error
    pub fn invalid(msg: impl Into<String>) -> Self {
        ConfettiError::InvalidConfiguration(msg.into())
    }

    /// Check `value` against the inclusive range `[min, max]`
    pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
        if value >= min && value <= max {
            Ok(())
        } else {
            Err(ConfettiError::ValueOutOfRange {
                field: field.to_string(),
                min,
                max,
                value,
            })
        }
    }

    /// True for errors caused by the caller describing an invalid effect
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ConfettiError::InvalidConfiguration(_) | ConfettiError::ValueOutOfRange { .. }
        )
    }
}

/// Result type alias for confetti operations
pub type Result<T> = std::result::Result<T, ConfettiError>;

impl From<toml::de::Error> for ConfettiError {
    fn from(err: toml::de::Error) -> Self {
        ConfettiError::TomlParseError(err.to_string())
    }
}
