//! Nested read views returned by the fetch endpoints.
//!
//! These are the shapes the timeline client consumes: perspectives in
//! display order, each carrying its initiatives in display order, each
//! carrying its optional schedule and assigned teams.

use serde::{Deserialize, Serialize};

use crate::ids::InitiativeId;
use crate::initiative::Initiative;
use crate::perspective::Perspective;
use crate::schedule::Schedule;
use crate::team::Team;

/// An initiative joined with its schedule and teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeView {
    #[serde(flatten)]
    pub initiative: Initiative,
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

/// A perspective with its initiatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveView {
    #[serde(flatten)]
    pub perspective: Perspective,
    #[serde(default)]
    pub initiatives: Vec<InitiativeView>,
}

/// A schedule joined with its initiative and that initiative's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleView {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub initiative: Initiative,
    pub perspective: Perspective,
}

/// A team with the initiatives assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamView {
    #[serde(flatten)]
    pub team: Team,
    #[serde(default)]
    pub initiatives: Vec<Initiative>,
}

/// Iterates every initiative in a nested fetch, in display order.
pub fn initiatives(data: &[PerspectiveView]) -> impl Iterator<Item = &InitiativeView> {
    data.iter().flat_map(|p| p.initiatives.iter())
}

/// Finds an initiative by id in a nested fetch.
pub fn find_initiative<'a>(
    data: &'a [PerspectiveView],
    id: &InitiativeId,
) -> Option<&'a InitiativeView> {
    initiatives(data).find(|i| &i.initiative.id == id)
}

/// Finds an initiative by its code (case-insensitive) in a nested fetch.
pub fn find_by_code<'a>(data: &'a [PerspectiveView], code: &str) -> Option<&'a InitiativeView> {
    initiatives(data).find(|i| i.initiative.code.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleInput;

    fn sample() -> Vec<PerspectiveView> {
        let perspective = Perspective::new("Financial", "#dbeafe", "#3b82f6", "#1e40af", 1);
        let init = Initiative::new(perspective.id.clone(), "F1", "License usage audit", 1);
        let schedule = Schedule::new(init.id.clone(), ScheduleInput::new(2026, 0, 2));
        vec![PerspectiveView {
            perspective,
            initiatives: vec![InitiativeView {
                initiative: init,
                schedule: Some(schedule),
                teams: vec![],
            }],
        }]
    }

    #[test]
    fn test_views_serialize_flat() {
        let data = sample();
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json[0]["name"], "Financial");
        assert_eq!(json[0]["initiatives"][0]["code"], "F1");
        assert_eq!(json[0]["initiatives"][0]["schedule"]["end_month"], 2);

        let back: Vec<PerspectiveView> = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_unscheduled_serializes_null() {
        let mut data = sample();
        data[0].initiatives[0].schedule = None;
        let json = serde_json::to_value(&data).unwrap();
        assert!(json[0]["initiatives"][0]["schedule"].is_null());
    }

    #[test]
    fn test_lookup_helpers() {
        let data = sample();
        let id = data[0].initiatives[0].initiative.id.clone();
        assert!(find_initiative(&data, &id).is_some());
        assert!(find_by_code(&data, "f1").is_some());
        assert!(find_by_code(&data, "F2").is_none());
    }
}
