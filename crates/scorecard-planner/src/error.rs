//! Error types for the planner client.

use thiserror::Error;

use scorecard_models::ValidationError;

/// Errors raised by the timeline editor and its HTTP client.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The server answered with a non-success status. `message` is the
    /// server's `error` text, unchanged.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("unknown initiative: {0}")]
    UnknownInitiative(String),

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl PlannerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlannerError::Api { status: 404, .. })
    }
}

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;
