//! Schedules: the month span assigned to an initiative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{InitiativeId, ScheduleId};
use crate::validation::{self, Validated};

/// A stored schedule. Exactly one per scheduled initiative.
///
/// Invariant: `start_month <= end_month`, both in 0-11.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub initiative_id: InitiativeId,
    pub year: i32,
    pub start_month: u8,
    pub end_month: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// Builds a schedule from validated input.
    pub fn new(initiative_id: InitiativeId, input: ScheduleInput) -> Self {
        let now = Utc::now();
        Self {
            id: ScheduleId::new(),
            initiative_id,
            year: input.year,
            start_month: input.start_month,
            end_month: input.end_month,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every field from `input`, keeping identity.
    pub fn overwrite(&mut self, input: ScheduleInput) {
        self.year = input.year;
        self.start_month = input.start_month;
        self.end_month = input.end_month;
        self.notes = input.notes;
        self.updated_at = Utc::now();
    }

    /// Applies a partial update and re-checks the ordering invariant.
    ///
    /// On error the schedule is left untouched.
    pub fn apply_patch(&mut self, patch: &SchedulePatch) -> Validated<()> {
        let start = patch.start_month.unwrap_or(self.start_month);
        let end = patch.end_month.unwrap_or(self.end_month);
        validation::month_span(start, end)?;
        self.start_month = start;
        self.end_month = end;
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Number of months covered, inclusive.
    pub fn duration_months(&self) -> u8 {
        self.end_month - self.start_month + 1
    }
}

/// Full field set for creating or upserting a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub year: i32,
    pub start_month: u8,
    pub end_month: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ScheduleInput {
    pub fn new(year: i32, start_month: u8, end_month: u8) -> Self {
        Self {
            year,
            start_month,
            end_month,
            notes: None,
        }
    }

    pub fn validate(&self) -> Validated<()> {
        validation::month("start_month", self.start_month as i64)?;
        validation::month("end_month", self.end_month as i64)?;
        validation::year(self.year as i64)?;
        validation::month_span(self.start_month, self.end_month)
    }
}

/// A partial schedule update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One entry of a bulk schedule update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSchedulePatch {
    pub id: ScheduleId,
    #[serde(flatten)]
    pub patch: SchedulePatch,
}
