//! Error handling for the PAYE engine
//!
//! Bad user input and bad tax rules are kept as separate variants so callers
//! can report them differently. The binary wraps these in anyhow for context
//! chaining.

use thiserror::Error;

/// Core error types for tax computations and rule loading
#[derive(Error, Debug)]
pub enum TaxError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

impl TaxError {
    /// True for errors caused by the caller's income inputs
    pub fn is_validation(&self) -> bool {
        matches!(self, TaxError::ValidationError(_))
    }

    /// True for errors caused by a malformed or unreadable rule set
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            TaxError::ConfigError(_) | TaxError::ParseError(_) | TaxError::Io(_)
        )
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, TaxError>;
