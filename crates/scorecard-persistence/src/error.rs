//! Error types for store operations.

use std::path::PathBuf;

use scorecard_models::ValidationError;
use thiserror::Error;

/// Errors raised by the plan store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Input failed field or invariant validation.
    #[error("{0}")]
    Validation(String),

    /// Referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Operation clashes with existing data (duplicate name, assigned team).
    #[error("{0}")]
    Conflict(String),

    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// A thread panicked while holding the store lock.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl PersistenceError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        PersistenceError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<ValidationError> for PersistenceError {
    fn from(err: ValidationError) -> Self {
        PersistenceError::Validation(err.0)
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
