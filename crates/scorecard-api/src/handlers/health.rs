//! Liveness probe.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.config.uptime().as_secs(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
