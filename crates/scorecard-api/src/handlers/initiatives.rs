//! Initiative handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use scorecard_models::{InitiativeId, InitiativeView, Schedule};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::handlers::parse_id;
use crate::state::AppState;
use crate::types::{CreateInitiativeRequest, UpdateInitiativeRequest, UpsertScheduleRequest};

fn initiative_id(raw: &str) -> Result<InitiativeId> {
    parse_id(raw, InitiativeId::parse, "initiative")
}

/// GET /api/initiatives - List all initiatives.
pub async fn list_initiatives(State(state): State<AppState>) -> Result<Json<Vec<InitiativeView>>> {
    Ok(Json(state.store.list_initiatives()?))
}

/// GET /api/initiatives/:id - Get an initiative by ID.
pub async fn get_initiative(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InitiativeView>> {
    let id = initiative_id(&id)?;
    Ok(Json(state.store.get_initiative(&id)?))
}

/// POST /api/initiatives - Create an initiative.
pub async fn create_initiative(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateInitiativeRequest>,
) -> Result<(StatusCode, Json<InitiativeView>)> {
    let view = state.store.create_initiative(req.into_new()?)?;
    info!(id = %view.initiative.id, code = %view.initiative.code, "initiative created");
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /api/initiatives/:id - Update an initiative.
pub async fn update_initiative(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateInitiativeRequest>,
) -> Result<Json<InitiativeView>> {
    let id = initiative_id(&id)?;
    Ok(Json(state.store.update_initiative(&id, req.into_update()?)?))
}

/// DELETE /api/initiatives/:id - Delete an initiative with its schedule
/// and team assignments.
pub async fn delete_initiative(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = initiative_id(&id)?;
    state.store.delete_initiative(&id)?;
    info!(id = %id, "initiative deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/initiatives/:id/schedule - Create or replace the schedule.
pub async fn upsert_initiative_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpsertScheduleRequest>,
) -> Result<Json<Schedule>> {
    let id = initiative_id(&id)?;
    let input = req.into_input(state.planning_year())?;
    Ok(Json(state.store.upsert_schedule(&id, input)?))
}
