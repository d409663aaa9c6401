//! Gantt data handler.

use axum::{extract::State, Json};

use scorecard_models::PerspectiveView;

use crate::error::Result;
use crate::state::AppState;

/// GET /api/gantt-data - Perspectives in display order with their
/// initiatives, schedules and teams nested.
pub async fn gantt_data(State(state): State<AppState>) -> Result<Json<Vec<PerspectiveView>>> {
    Ok(Json(state.store.gantt_data()?))
}
