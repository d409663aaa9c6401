//! Persistence layer for the scorecard planner.
//!
//! This crate stores the whole plan (perspectives, initiatives, schedules,
//! teams and team assignments) as a single JSON document written with
//! atomic file operations (write to temp file, then rename).
//!
//! # Example
//!
//! ```no_run
//! use scorecard_persistence::{seed_defaults, PlanStore};
//! use scorecard_models::ScheduleInput;
//!
//! let store = PlanStore::open("/home/user/.scorecard").unwrap();
//! seed_defaults(&store).unwrap();
//!
//! let data = store.gantt_data().unwrap();
//! let first = &data[0].initiatives[0].initiative.id;
//! store.upsert_schedule(first, ScheduleInput::new(2026, 0, 3)).unwrap();
//! ```

pub mod atomic;
pub mod error;
pub mod seed;
pub mod store;

pub use error::{PersistenceError, Result};
pub use seed::{seed_defaults, SeedReport};
pub use store::{Assignment, PlanDocument, PlanStore, DEFAULT_PLANNING_YEAR, PLAN_FILE};
