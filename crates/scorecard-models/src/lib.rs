//! Core data models for the scorecard planner.
//!
//! This crate provides the types shared by the store, the REST API and the
//! timeline client: perspectives, initiatives, schedules, teams, the nested
//! fetch views, month tables and field validation.

pub mod calendar;
pub mod ids;
pub mod initiative;
pub mod perspective;
pub mod schedule;
pub mod team;
pub mod validation;
pub mod views;

pub use calendar::{
    month_name, month_short, LAST_MONTH, MONTHS, MONTHS_PER_YEAR, MONTHS_SHORT, QUARTER_LABELS,
};
pub use ids::{InitiativeId, PerspectiveId, ScheduleId, TeamId};
pub use initiative::{Initiative, InitiativeUpdate, NewInitiative, Priority};
pub use perspective::Perspective;
pub use schedule::{BulkSchedulePatch, Schedule, ScheduleInput, SchedulePatch};
pub use team::{NewTeam, Team, TeamUpdate};
pub use validation::ValidationError;
pub use views::{InitiativeView, PerspectiveView, ScheduleView, TeamView};
