//! Application state shared across handlers.

use std::sync::Arc;

use scorecard_persistence::PlanStore;

use crate::config::ApiConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Plan document store.
    pub store: Arc<PlanStore>,
}

impl AppState {
    pub fn new(config: ApiConfig, store: PlanStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Year applied to schedule writes that omit one.
    pub fn planning_year(&self) -> i32 {
        self.store.planning_year()
    }
}
