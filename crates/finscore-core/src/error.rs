//! Error types for source, store and parse operations.
//!
//! The normalization, comparison and scoring functions never fail: missing or
//! degenerate input degrades to `None` or a neutral default. [`ScoreError`] only
//! covers the boundaries around them (parsing upstream documents, reading
//! stores, picking a fact source, validating a scoring policy).

use thiserror::Error;

/// Errors that can occur around the normalization and scoring pipeline.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// Error reading from or writing to a statement store.
    #[error("Store error: {0}")]
    Store(String),

    /// Error parsing an upstream document (company facts JSON, stored rows).
    #[error("Parse error: {0}")]
    Parse(String),

    /// The requested symbol was not found by any source.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Facts were fetched but no informative statement rows could be built.
    #[error("No statement data available for {0}")]
    DataNotAvailable(String),

    /// No fact source is configured.
    #[error("Source not configured: {0}")]
    SourceNotConfigured(String),

    /// An invalid parameter was provided (e.g. scoring weights not summing to 1).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`ScoreError`].
pub type Result<T> = std::result::Result<T, ScoreError>;
