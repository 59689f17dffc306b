//! Error types for Sieve Core

use thiserror::Error;

/// Result type for Sieve operations
pub type Result<T> = std::result::Result<T, SieveError>;

/// Errors that can occur while building or enforcing specifications
#[derive(Error, Debug)]
pub enum SieveError {
    /// A candidate failed a specification during `validate_or_raise`
    #[error("Rule violation: {0}")]
    RuleViolation(String),

    /// A caller passed an argument the operation cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Settings could not be read
    #[error("Config error: {0}")]
    ConfigError(#[from] serde_yaml::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SieveError {
    /// The joined failure explanation carried by a rule violation.
    pub fn explanation(&self) -> Option<&str> {
        match self {
            SieveError::RuleViolation(text) => Some(text),
            _ => None,
        }
    }
}
