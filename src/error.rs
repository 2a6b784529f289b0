//! Error types for boutstats

use thiserror::Error;

/// Errors that can occur at the edges of the analysis (input, configuration, output).
///
/// The bout core itself never fails: short rows degrade into fewer bouts.
#[derive(Debug, Error)]
pub enum BoutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse table: {0}")]
    ParseError(String),
}
