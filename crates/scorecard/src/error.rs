//! Error type for the command-line tools.

use thiserror::Error;

use scorecard_persistence::PersistenceError;
use scorecard_planner::PlannerError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] PersistenceError),

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
