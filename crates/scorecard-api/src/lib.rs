//! REST API for the scorecard planner.
//!
//! This crate exposes the plan store over HTTP:
//! - Gantt data (perspectives with nested initiatives, schedules and teams)
//! - Initiative CRUD and the schedule upsert used by the timeline editor
//! - Schedule CRUD and all-or-nothing bulk updates
//! - Team CRUD
//!
//! Errors are returned as `{"error": message}` with a 400, 404, 409 or 500
//! status.
//!
//! # Example
//!
//! ```ignore
//! use scorecard_api::{serve, ApiConfig, AppState};
//! use scorecard_persistence::PlanStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PlanStore::open("/var/lib/scorecard")?;
//!     let config = ApiConfig::default();
//!     serve(config.clone(), AppState::new(config, store)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use extract::ApiJson;
pub use router::{create_router, serve};
pub use state::AppState;
