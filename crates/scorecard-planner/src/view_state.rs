//! Local view of initiative schedules.
//!
//! Seeded from the nested fetch and mutated optimistically by gestures.
//! Entries track whether the server has confirmed their current values; a
//! fresh fetch replaces everything.

use std::collections::HashMap;

use scorecard_models::{InitiativeId, PerspectiveView, Schedule, ScheduleId, ScheduleInput};

use crate::drag::MonthSpan;

/// How an entry relates to the server copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Matches the last fetch or a confirmed save.
    Synced,
    /// Changed locally, save not yet confirmed.
    Pending,
    /// The last save for this entry failed.
    Unconfirmed,
}

/// A schedule as the editor currently shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// Server id, once known.
    pub schedule_id: Option<ScheduleId>,
    pub year: i32,
    pub start_month: u8,
    pub end_month: u8,
    pub notes: Option<String>,
    pub sync: SyncState,
}

impl ScheduleEntry {
    fn from_schedule(schedule: &Schedule) -> Self {
        Self {
            schedule_id: Some(schedule.id.clone()),
            year: schedule.year,
            start_month: schedule.start_month,
            end_month: schedule.end_month,
            notes: schedule.notes.clone(),
            sync: SyncState::Synced,
        }
    }

    pub fn span(&self) -> MonthSpan {
        MonthSpan {
            start: self.start_month,
            end: self.end_month,
        }
    }

    /// The upsert body that would persist this entry.
    pub fn to_input(&self) -> ScheduleInput {
        ScheduleInput {
            year: self.year,
            start_month: self.start_month,
            end_month: self.end_month,
            notes: self.notes.clone(),
        }
    }

    fn matches(&self, schedule: &Schedule) -> bool {
        self.year == schedule.year
            && self.start_month == schedule.start_month
            && self.end_month == schedule.end_month
    }
}

/// Fields to merge into an entry; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulePartial {
    pub year: Option<i32>,
    pub start_month: Option<u8>,
    pub end_month: Option<u8>,
    pub notes: Option<String>,
}

impl SchedulePartial {
    pub fn span(year: i32, span: MonthSpan) -> Self {
        Self {
            year: Some(year),
            start_month: Some(span.start),
            end_month: Some(span.end),
            notes: None,
        }
    }
}

/// Initiative → schedule mapping owned by one editor.
#[derive(Debug, Clone)]
pub struct ViewState {
    planning_year: i32,
    entries: HashMap<InitiativeId, ScheduleEntry>,
}

impl ViewState {
    pub fn new(planning_year: i32) -> Self {
        Self {
            planning_year,
            entries: HashMap::new(),
        }
    }

    /// Builds the mapping from a nested fetch.
    pub fn initialize(&mut self, data: &[PerspectiveView]) {
        self.entries = data
            .iter()
            .flat_map(|p| &p.initiatives)
            .filter_map(|i| {
                i.schedule
                    .as_ref()
                    .map(|s| (i.initiative.id.clone(), ScheduleEntry::from_schedule(s)))
            })
            .collect();
    }

    /// Replaces every entry, optimistic ones included, with fetched data.
    pub fn reconcile_after_fetch(&mut self, data: &[PerspectiveView]) {
        self.initialize(data);
    }

    /// Merges `partial` into the entry, creating it if absent.
    pub fn apply_optimistic(
        &mut self,
        initiative_id: &InitiativeId,
        partial: SchedulePartial,
    ) -> &ScheduleEntry {
        let planning_year = self.planning_year;
        let entry = self
            .entries
            .entry(initiative_id.clone())
            .or_insert_with(|| ScheduleEntry {
                schedule_id: None,
                year: planning_year,
                start_month: 0,
                end_month: 0,
                notes: None,
                sync: SyncState::Pending,
            });
        if let Some(year) = partial.year {
            entry.year = year;
        }
        if let Some(start) = partial.start_month {
            entry.start_month = start;
        }
        if let Some(end) = partial.end_month {
            entry.end_month = end;
        }
        if partial.notes.is_some() {
            entry.notes = partial.notes;
        }
        entry.sync = SyncState::Pending;
        entry
    }

    pub fn remove(&mut self, initiative_id: &InitiativeId) -> Option<ScheduleEntry> {
        self.entries.remove(initiative_id)
    }

    /// Puts back an entry taken before a gesture; `None` removes it.
    pub fn restore(&mut self, initiative_id: &InitiativeId, entry: Option<ScheduleEntry>) {
        match entry {
            Some(entry) => {
                self.entries.insert(initiative_id.clone(), entry);
            }
            None => {
                self.entries.remove(initiative_id);
            }
        }
    }

    /// Records a save acknowledged by the server. A response for values
    /// that have since changed locally only contributes the id.
    pub fn confirm_saved(&mut self, schedule: &Schedule) {
        let Some(entry) = self.entries.get_mut(&schedule.initiative_id) else {
            return;
        };
        entry.schedule_id = Some(schedule.id.clone());
        if entry.matches(schedule) && entry.sync != SyncState::Synced {
            entry.sync = SyncState::Synced;
        }
    }

    /// Flags an entry whose save failed. Its values are kept.
    pub fn mark_unconfirmed(&mut self, initiative_id: &InitiativeId) {
        if let Some(entry) = self.entries.get_mut(initiative_id) {
            entry.sync = SyncState::Unconfirmed;
        }
    }

    pub fn get(&self, initiative_id: &InitiativeId) -> Option<&ScheduleEntry> {
        self.entries.get(initiative_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InitiativeId, &ScheduleEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries not yet confirmed by the server.
    pub fn unsynced(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.sync != SyncState::Synced)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_models::{Initiative, InitiativeView, Perspective};

    fn fixture() -> (Vec<PerspectiveView>, InitiativeId, InitiativeId) {
        let perspective = Perspective::new("Financial", "#dbeafe", "#3b82f6", "#1e40af", 1);
        let scheduled = Initiative::new(perspective.id.clone(), "F1", "License audit", 1);
        let unscheduled = Initiative::new(perspective.id.clone(), "F2", "Monitoring", 2);
        let schedule = Schedule::new(scheduled.id.clone(), ScheduleInput::new(2026, 2, 5));
        let ids = (scheduled.id.clone(), unscheduled.id.clone());
        let data = vec![PerspectiveView {
            perspective,
            initiatives: vec![
                InitiativeView {
                    initiative: scheduled,
                    schedule: Some(schedule),
                    teams: vec![],
                },
                InitiativeView {
                    initiative: unscheduled,
                    schedule: None,
                    teams: vec![],
                },
            ],
        }];
        (data, ids.0, ids.1)
    }

    #[test]
    fn test_initialize_maps_only_scheduled() {
        let (data, scheduled, unscheduled) = fixture();
        let mut view = ViewState::new(2026);
        view.initialize(&data);

        assert_eq!(view.len(), 1);
        let entry = view.get(&scheduled).unwrap();
        assert_eq!(entry.span(), MonthSpan { start: 2, end: 5 });
        assert_eq!(entry.sync, SyncState::Synced);
        assert!(view.get(&unscheduled).is_none());
    }

    #[test]
    fn test_apply_optimistic_merges_and_creates() {
        let (data, scheduled, unscheduled) = fixture();
        let mut view = ViewState::new(2026);
        view.initialize(&data);

        let entry = view.apply_optimistic(
            &scheduled,
            SchedulePartial {
                end_month: Some(9),
                ..Default::default()
            },
        );
        assert_eq!(entry.span(), MonthSpan { start: 2, end: 9 });
        assert!(entry.schedule_id.is_some());
        assert_eq!(entry.sync, SyncState::Pending);

        let created = view.apply_optimistic(
            &unscheduled,
            SchedulePartial::span(2026, MonthSpan { start: 0, end: 3 }),
        );
        assert_eq!(created.schedule_id, None);
        assert_eq!(created.year, 2026);
        assert_eq!(view.unsynced(), 2);
    }

    #[test]
    fn test_confirm_saved_assigns_id() {
        let (data, _, unscheduled) = fixture();
        let mut view = ViewState::new(2026);
        view.initialize(&data);
        view.apply_optimistic(
            &unscheduled,
            SchedulePartial::span(2026, MonthSpan { start: 0, end: 3 }),
        );

        let saved = Schedule::new(unscheduled.clone(), ScheduleInput::new(2026, 0, 3));
        view.confirm_saved(&saved);

        let entry = view.get(&unscheduled).unwrap();
        assert_eq!(entry.schedule_id.as_ref(), Some(&saved.id));
        assert_eq!(entry.sync, SyncState::Synced);
    }

    #[test]
    fn test_stale_confirmation_keeps_newer_values() {
        let (data, scheduled, _) = fixture();
        let mut view = ViewState::new(2026);
        view.initialize(&data);
        view.apply_optimistic(
            &scheduled,
            SchedulePartial::span(2026, MonthSpan { start: 6, end: 8 }),
        );

        let stale = Schedule::new(scheduled.clone(), ScheduleInput::new(2026, 3, 5));
        view.confirm_saved(&stale);

        let entry = view.get(&scheduled).unwrap();
        assert_eq!(entry.span(), MonthSpan { start: 6, end: 8 });
        assert_eq!(entry.sync, SyncState::Pending);
    }

    #[test]
    fn test_mark_unconfirmed_keeps_values() {
        let (data, scheduled, _) = fixture();
        let mut view = ViewState::new(2026);
        view.initialize(&data);
        view.apply_optimistic(
            &scheduled,
            SchedulePartial::span(2026, MonthSpan { start: 6, end: 8 }),
        );
        view.mark_unconfirmed(&scheduled);

        let entry = view.get(&scheduled).unwrap();
        assert_eq!(entry.sync, SyncState::Unconfirmed);
        assert_eq!(entry.span(), MonthSpan { start: 6, end: 8 });
    }

    #[test]
    fn test_reconcile_discards_optimistic_state() {
        let (data, scheduled, unscheduled) = fixture();
        let mut view = ViewState::new(2026);
        view.initialize(&data);
        view.apply_optimistic(
            &scheduled,
            SchedulePartial::span(2026, MonthSpan { start: 9, end: 11 }),
        );
        view.apply_optimistic(
            &unscheduled,
            SchedulePartial::span(2026, MonthSpan { start: 0, end: 0 }),
        );
        view.remove(&scheduled);

        view.reconcile_after_fetch(&data);

        assert_eq!(view.len(), 1);
        assert_eq!(
            view.get(&scheduled).unwrap().span(),
            MonthSpan { start: 2, end: 5 }
        );
        assert_eq!(view.unsynced(), 0);
    }

    #[test]
    fn test_restore_round_trips_snapshot() {
        let (data, scheduled, _) = fixture();
        let mut view = ViewState::new(2026);
        view.initialize(&data);
        let snapshot = view.get(&scheduled).cloned();

        view.apply_optimistic(
            &scheduled,
            SchedulePartial::span(2026, MonthSpan { start: 9, end: 11 }),
        );
        view.restore(&scheduled, snapshot.clone());
        assert_eq!(view.get(&scheduled).cloned(), snapshot);

        view.restore(&scheduled, None);
        assert!(view.is_empty());
    }
}
