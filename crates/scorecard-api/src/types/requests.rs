//! Request DTOs for the API.
//!
//! Numbers arrive as `i64` and ids as plain strings so that out-of-range or
//! malformed input produces a 400 with a readable message instead of a
//! deserialization rejection.

use serde::Deserialize;

use scorecard_models::{
    initiative::{CODE_MAX_LEN, EFFORT_MAX_LEN, NAME_MAX_LEN, TARGET_KPI_MAX_LEN},
    validation, BulkSchedulePatch, InitiativeUpdate, NewInitiative, PerspectiveId, Priority,
    ScheduleId, ScheduleInput, SchedulePatch, TeamId,
};

use crate::error::{ApiError, Result};
use crate::handlers::parse_id;

/// Create or replace an initiative's schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertScheduleRequest {
    /// Defaults to the planning year.
    pub year: Option<i64>,
    pub start_month: i64,
    pub end_month: i64,
    pub notes: Option<String>,
}

impl UpsertScheduleRequest {
    pub fn into_input(self, default_year: i32) -> Result<ScheduleInput> {
        let year = match self.year {
            Some(y) => validation::year(y)?,
            None => default_year,
        };
        Ok(ScheduleInput {
            year,
            start_month: validation::month("Start month", self.start_month)?,
            end_month: validation::month("End month", self.end_month)?,
            notes: self.notes,
        })
    }
}

/// Create a schedule for an initiative that has none.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScheduleRequest {
    pub initiative_id: String,
    #[serde(flatten)]
    pub schedule: UpsertScheduleRequest,
}

/// Partial schedule update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateScheduleRequest {
    pub year: Option<i64>,
    pub start_month: Option<i64>,
    pub end_month: Option<i64>,
    pub notes: Option<String>,
}

impl UpdateScheduleRequest {
    pub fn into_patch(self) -> Result<SchedulePatch> {
        Ok(SchedulePatch {
            year: self.year.map(validation::year).transpose()?,
            start_month: self
                .start_month
                .map(|m| validation::month("Start month", m))
                .transpose()?,
            end_month: self
                .end_month
                .map(|m| validation::month("End month", m))
                .transpose()?,
            notes: self.notes,
        })
    }
}

/// One entry of a bulk update.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkScheduleItem {
    pub id: String,
    #[serde(flatten)]
    pub update: UpdateScheduleRequest,
}

/// Bulk schedule update. Applied all-or-nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkUpdateRequest {
    pub schedules: Option<Vec<BulkScheduleItem>>,
}

impl BulkUpdateRequest {
    /// An empty array is a no-op; a missing one is rejected.
    pub fn into_patches(self) -> Result<Vec<BulkSchedulePatch>> {
        let schedules = self.schedules.ok_or_else(|| {
            ApiError::BadRequest("Schedules must be an array".to_string())
        })?;
        schedules
            .into_iter()
            .map(|item| {
                let id = ScheduleId::parse(&item.id).ok_or_else(|| {
                    ApiError::BadRequest(format!("Schedule {}: invalid schedule ID", item.id))
                })?;
                let patch = item
                    .update
                    .into_patch()
                    .map_err(|e| ApiError::BadRequest(format!("Schedule {}: {}", id, e)))?;
                Ok(BulkSchedulePatch { id, patch })
            })
            .collect()
    }
}

/// Create initiative request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInitiativeRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub perspective_id: String,
    pub description: Option<String>,
    pub target_kpi: Option<String>,
    pub estimated_effort: Option<String>,
    /// One of high, medium, low.
    pub priority: Option<String>,
    pub display_order: Option<i32>,
    pub team_ids: Option<Vec<String>>,
}

impl CreateInitiativeRequest {
    pub fn into_new(self) -> Result<NewInitiative> {
        Ok(NewInitiative {
            code: validation::required_text("Code", &self.code, CODE_MAX_LEN)?,
            name: validation::required_text("Name", &self.name, NAME_MAX_LEN)?,
            perspective_id: parse_id(&self.perspective_id, PerspectiveId::parse, "perspective")?,
            description: self.description,
            target_kpi: validation::optional_text("Target KPI", self.target_kpi, TARGET_KPI_MAX_LEN)?,
            estimated_effort: validation::optional_text(
                "Estimated effort",
                self.estimated_effort,
                EFFORT_MAX_LEN,
            )?,
            priority: self.priority.as_deref().map(parse_priority).transpose()?,
            display_order: self.display_order.unwrap_or(0),
            team_ids: parse_team_ids(self.team_ids.unwrap_or_default())?,
        })
    }
}

/// Partial initiative update. `team_ids` replaces the whole assignment set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInitiativeRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub perspective_id: Option<String>,
    pub description: Option<String>,
    pub target_kpi: Option<String>,
    pub estimated_effort: Option<String>,
    pub priority: Option<String>,
    pub display_order: Option<i32>,
    pub team_ids: Option<Vec<String>>,
}

impl UpdateInitiativeRequest {
    pub fn into_update(self) -> Result<InitiativeUpdate> {
        Ok(InitiativeUpdate {
            code: self.code,
            name: self.name,
            perspective_id: self
                .perspective_id
                .as_deref()
                .map(|raw| parse_id(raw, PerspectiveId::parse, "perspective"))
                .transpose()?,
            description: self.description,
            target_kpi: self.target_kpi,
            estimated_effort: self.estimated_effort,
            priority: self.priority.as_deref().map(parse_priority).transpose()?,
            display_order: self.display_order,
            team_ids: self.team_ids.map(parse_team_ids).transpose()?,
        })
    }
}

fn parse_priority(raw: &str) -> Result<Priority> {
    Priority::parse(raw).ok_or_else(|| {
        ApiError::BadRequest("Priority must be high, medium, or low".to_string())
    })
}

fn parse_team_ids(raw: Vec<String>) -> Result<Vec<TeamId>> {
    raw.iter()
        .map(|id| parse_id(id, TeamId::parse, "team"))
        .collect()
}
