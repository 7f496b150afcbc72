//! Structured error types for the Aequorea ecosystem.

use thiserror::Error;

/// Unified error type for all Aequorea operations.
#[derive(Debug, Error)]
pub enum AequoreaError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed input data)
    #[error("parse error: {0}")]
    Parse(String),

    /// Shape mismatch between related inputs (e.g. a confidence vector whose
    /// length differs from the vocabulary). Fatal: the run aborts, no
    /// skip-and-continue.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the Aequorea ecosystem.
pub type Result<T> = std::result::Result<T, AequoreaError>;
