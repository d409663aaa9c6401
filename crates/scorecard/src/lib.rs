//! Scorecard command-line tools.
//!
//! Hosts the REST API server, seeds the store, exports the plan and drives
//! timeline edits against a running server.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use error::{CliError, Result};
