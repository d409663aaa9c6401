//! Schedule handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use scorecard_models::{InitiativeId, Schedule, ScheduleId, ScheduleView};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::handlers::parse_id;
use crate::state::AppState;
use crate::types::{BulkUpdateRequest, CreateScheduleRequest, UpdateScheduleRequest};

fn schedule_id(raw: &str) -> Result<ScheduleId> {
    parse_id(raw, ScheduleId::parse, "schedule")
}

/// GET /api/schedules - List schedules ordered by start month.
pub async fn list_schedules(State(state): State<AppState>) -> Result<Json<Vec<ScheduleView>>> {
    Ok(Json(state.store.list_schedules()?))
}

/// GET /api/schedules/:id - Get a schedule by ID.
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScheduleView>> {
    let id = schedule_id(&id)?;
    Ok(Json(state.store.get_schedule(&id)?))
}

/// POST /api/schedules - Create a schedule.
pub async fn create_schedule(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleView>)> {
    let initiative_id = parse_id(&req.initiative_id, InitiativeId::parse, "initiative")?;
    let input = req.schedule.into_input(state.planning_year())?;
    let view = state.store.create_schedule(&initiative_id, input)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /api/schedules/:id - Partially update a schedule.
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateScheduleRequest>,
) -> Result<Json<ScheduleView>> {
    let id = schedule_id(&id)?;
    Ok(Json(state.store.update_schedule(&id, req.into_patch()?)?))
}

/// DELETE /api/schedules/:id - Delete a schedule.
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = schedule_id(&id)?;
    state.store.delete_schedule(&id)?;
    info!(id = %id, "schedule deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/schedules/bulk - Update several schedules at once.
pub async fn bulk_update_schedules(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BulkUpdateRequest>,
) -> Result<Json<Vec<Schedule>>> {
    let patches = req.into_patches()?;
    let count = patches.len();
    let updated = state.store.bulk_update_schedules(patches)?;
    info!(count, "bulk schedule update");
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::handlers::make_test_state;
    use crate::types::BulkScheduleItem;
    use scorecard_models::ScheduleInput;

    fn scheduled(state: &AppState, start: u8, end: u8) -> Schedule {
        let id = state.store.list_initiatives().unwrap()[0]
            .initiative
            .id
            .clone();
        state
            .store
            .upsert_schedule(&id, ScheduleInput::new(2026, start, end))
            .unwrap()
    }

    #[tokio::test]
    async fn test_update_schedule_checks_merged_span() {
        let state = make_test_state();
        let schedule = scheduled(&state, 3, 5);

        let req = UpdateScheduleRequest {
            start_month: Some(8),
            ..Default::default()
        };
        let err = update_schedule(State(state.clone()), Path(schedule.id.to_string()), ApiJson(req))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let Json(view) = get_schedule(State(state), Path(schedule.id.to_string()))
            .await
            .unwrap();
        assert_eq!(view.schedule.start_month, 3);
    }

    #[tokio::test]
    async fn test_bulk_update_is_all_or_nothing() {
        let state = make_test_state();
        let schedule = scheduled(&state, 1, 2);

        let req = BulkUpdateRequest {
            schedules: Some(vec![
                BulkScheduleItem {
                    id: schedule.id.to_string(),
                    update: UpdateScheduleRequest {
                        end_month: Some(6),
                        ..Default::default()
                    },
                },
                BulkScheduleItem {
                    id: ScheduleId::new().to_string(),
                    update: UpdateScheduleRequest::default(),
                },
            ]),
        };
        let err = bulk_update_schedules(State(state.clone()), ApiJson(req))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let stored = state.store.get_schedule(&schedule.id).unwrap();
        assert_eq!(stored.schedule.end_month, 2);
    }

    #[tokio::test]
    async fn test_delete_schedule_returns_no_content() {
        let state = make_test_state();
        let schedule = scheduled(&state, 0, 0);

        let status = delete_schedule(State(state.clone()), Path(schedule.id.to_string()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.store.list_schedules().unwrap().is_empty());
    }
}
