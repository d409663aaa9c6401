//! Perspective handlers.

use axum::{
    extract::{Path, State},
    Json,
};

use scorecard_models::{PerspectiveId, PerspectiveView};

use crate::error::Result;
use crate::handlers::parse_id;
use crate::state::AppState;

/// GET /api/perspectives - List perspectives with their initiatives.
pub async fn list_perspectives(
    State(state): State<AppState>,
) -> Result<Json<Vec<PerspectiveView>>> {
    Ok(Json(state.store.gantt_data()?))
}

/// GET /api/perspectives/:id - Get one perspective.
pub async fn get_perspective(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PerspectiveView>> {
    let id = parse_id(&id, PerspectiveId::parse, "perspective")?;
    Ok(Json(state.store.get_perspective(&id)?))
}
