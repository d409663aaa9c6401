//! API request handlers.

pub mod gantt;
pub mod health;
pub mod initiatives;
pub mod perspectives;
pub mod schedules;
pub mod teams;

pub use gantt::*;
pub use health::*;
pub use initiatives::*;
pub use perspectives::*;
pub use schedules::*;
pub use teams::*;

use crate::error::{ApiError, Result};

/// Parses a path or body id, rejecting malformed values with a 400.
pub(crate) fn parse_id<T>(raw: &str, parse: fn(&str) -> Option<T>, kind: &str) -> Result<T> {
    parse(raw).ok_or_else(|| ApiError::BadRequest(format!("Valid {} ID is required", kind)))
}

#[cfg(test)]
pub(crate) fn make_test_state() -> crate::state::AppState {
    use crate::config::ApiConfig;
    use scorecard_persistence::{seed_defaults, PlanStore};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_path_buf();
    std::mem::forget(dir);

    let store = PlanStore::open(&path).unwrap();
    seed_defaults(&store).unwrap();
    crate::state::AppState::new(ApiConfig::default(), store)
}
