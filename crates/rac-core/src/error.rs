//! Error types for rac-core

use thiserror::Error;

/// Result type alias using rac-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rac-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// `SQLite` error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A draft was rejected by the validator
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A backup or taxonomy file could not be imported
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Reasons a record draft cannot be accepted.
///
/// Both are user-correctable; the draft is left untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Fill in either an activity or an interaction")]
    MissingClassification,

    #[error("An interaction needs at least one counterparty (up to 3)")]
    MissingCounterparties,
}

/// Reasons an external JSON document was rejected on import.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The input is not well-formed JSON
    #[error("Malformed JSON: {0}")]
    Parse(String),

    /// Well-formed JSON with the wrong overall shape
    #[error("Invalid structure: {0}")]
    Structure(String),

    /// An element is missing a required field or has a bad value
    #[error("Invalid record at index {index}: {message}")]
    Field { index: usize, message: String },
}

impl From<serde_json::Error> for ImportError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
