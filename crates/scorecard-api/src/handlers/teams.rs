//! Team handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use scorecard_models::{NewTeam, Team, TeamId, TeamUpdate, TeamView};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::handlers::parse_id;
use crate::state::AppState;

fn team_id(raw: &str) -> Result<TeamId> {
    parse_id(raw, TeamId::parse, "team")
}

/// GET /api/teams - List teams by name.
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<TeamView>>> {
    Ok(Json(state.store.list_teams()?))
}

/// GET /api/teams/:id - Get a team with its initiatives.
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeamView>> {
    let id = team_id(&id)?;
    Ok(Json(state.store.get_team(&id)?))
}

/// POST /api/teams - Create a team.
pub async fn create_team(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewTeam>,
) -> Result<(StatusCode, Json<Team>)> {
    let team = state.store.create_team(req)?;
    info!(id = %team.id, name = %team.name, "team created");
    Ok((StatusCode::CREATED, Json(team)))
}

/// PUT /api/teams/:id - Update a team.
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<TeamUpdate>,
) -> Result<Json<Team>> {
    let id = team_id(&id)?;
    Ok(Json(state.store.update_team(&id, req)?))
}

/// DELETE /api/teams/:id - Delete a team that has no assignments.
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = team_id(&id)?;
    state.store.delete_team(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
