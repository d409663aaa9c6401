//! PlanStore - the relational plan kept as one crash-safe JSON document.
//!
//! Tables (perspectives, initiatives, schedules, teams and the
//! initiative/team join) live in a single [`PlanDocument`]. Reads take a
//! shared lock; every write clones the document, applies the change,
//! persists the clone atomically and only then swaps it in, so a failed
//! validation or write leaves both disk and memory untouched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use scorecard_models::initiative::{
    CODE_MAX_LEN, EFFORT_MAX_LEN, NAME_MAX_LEN, TARGET_KPI_MAX_LEN,
};
use scorecard_models::team::TEAM_NAME_MAX_LEN;
use scorecard_models::validation;
use scorecard_models::{
    BulkSchedulePatch, Initiative, InitiativeId, InitiativeUpdate, InitiativeView, NewInitiative,
    NewTeam, Perspective, PerspectiveId, PerspectiveView, Schedule, ScheduleId, ScheduleInput,
    SchedulePatch, ScheduleView, Team, TeamId, TeamUpdate, TeamView,
};

use crate::atomic::{read_document, write_document};
use crate::error::{PersistenceError, Result};

/// File name of the plan document inside the data directory.
pub const PLAN_FILE: &str = "plan.json";

/// Planning year used when a schedule write omits one.
pub const DEFAULT_PLANNING_YEAR: i32 = 2026;

const DOCUMENT_VERSION: u32 = 1;

/// One row of the initiative/team join table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub initiative_id: InitiativeId,
    pub team_id: TeamId,
}

/// The whole plan as persisted on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDocument {
    pub version: u32,
    #[serde(default)]
    pub perspectives: Vec<Perspective>,
    #[serde(default)]
    pub initiatives: Vec<Initiative>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl Default for PlanDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            perspectives: Vec::new(),
            initiatives: Vec::new(),
            schedules: Vec::new(),
            teams: Vec::new(),
            assignments: Vec::new(),
        }
    }
}

impl PlanDocument {
    fn perspective(&self, id: &PerspectiveId) -> Result<&Perspective> {
        self.perspectives
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| PersistenceError::not_found("perspective", id))
    }

    fn initiative(&self, id: &InitiativeId) -> Result<&Initiative> {
        self.initiatives
            .iter()
            .find(|i| &i.id == id)
            .ok_or_else(|| PersistenceError::not_found("initiative", id))
    }

    fn initiative_mut(&mut self, id: &InitiativeId) -> Result<&mut Initiative> {
        self.initiatives
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| PersistenceError::not_found("initiative", id))
    }

    fn schedule_for(&self, initiative_id: &InitiativeId) -> Option<&Schedule> {
        self.schedules
            .iter()
            .find(|s| &s.initiative_id == initiative_id)
    }

    fn team(&self, id: &TeamId) -> Result<&Team> {
        self.teams
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| PersistenceError::not_found("team", id))
    }

    fn teams_for(&self, initiative_id: &InitiativeId) -> Vec<Team> {
        let mut teams: Vec<Team> = self
            .assignments
            .iter()
            .filter(|a| &a.initiative_id == initiative_id)
            .filter_map(|a| self.teams.iter().find(|t| t.id == a.team_id).cloned())
            .collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        teams
    }

    fn initiative_view(&self, initiative: &Initiative) -> InitiativeView {
        InitiativeView {
            initiative: initiative.clone(),
            schedule: self.schedule_for(&initiative.id).cloned(),
            teams: self.teams_for(&initiative.id),
        }
    }

    fn perspective_view(&self, perspective: &Perspective) -> PerspectiveView {
        let mut initiatives: Vec<&Initiative> = self
            .initiatives
            .iter()
            .filter(|i| i.perspective_id == perspective.id)
            .collect();
        initiatives.sort_by_key(|i| i.display_order);
        PerspectiveView {
            perspective: perspective.clone(),
            initiatives: initiatives
                .into_iter()
                .map(|i| self.initiative_view(i))
                .collect(),
        }
    }

    fn schedule_view(&self, schedule: &Schedule) -> Result<ScheduleView> {
        let initiative = self.initiative(&schedule.initiative_id)?;
        let perspective = self.perspective(&initiative.perspective_id)?;
        Ok(ScheduleView {
            schedule: schedule.clone(),
            initiative: initiative.clone(),
            perspective: perspective.clone(),
        })
    }

    fn team_view(&self, team: &Team) -> TeamView {
        let initiatives = self
            .assignments
            .iter()
            .filter(|a| a.team_id == team.id)
            .filter_map(|a| self.initiatives.iter().find(|i| i.id == a.initiative_id).cloned())
            .collect();
        TeamView {
            team: team.clone(),
            initiatives,
        }
    }

    fn ensure_teams_exist(&self, team_ids: &[TeamId]) -> Result<()> {
        for id in team_ids {
            self.team(id)?;
        }
        Ok(())
    }

    fn ensure_unique_code(&self, code: &str, except: Option<&InitiativeId>) -> Result<()> {
        let taken = self
            .initiatives
            .iter()
            .any(|i| Some(&i.id) != except && i.code.eq_ignore_ascii_case(code));
        if taken {
            return Err(PersistenceError::Conflict(format!(
                "Initiative code {code} already exists"
            )));
        }
        Ok(())
    }

    fn ensure_unique_team_name(&self, name: &str, except: Option<&TeamId>) -> Result<()> {
        let taken = self
            .teams
            .iter()
            .any(|t| Some(&t.id) != except && t.name.eq_ignore_ascii_case(name));
        if taken {
            return Err(PersistenceError::Conflict(
                "Team name already exists".to_string(),
            ));
        }
        Ok(())
    }

    /// Brings the assignment rows of `initiative_id` to exactly `desired`,
    /// touching only the rows that differ.
    fn sync_assignments(&mut self, initiative_id: &InitiativeId, desired: &[TeamId]) {
        let desired: HashSet<&TeamId> = desired.iter().collect();
        let current: HashSet<TeamId> = self
            .assignments
            .iter()
            .filter(|a| &a.initiative_id == initiative_id)
            .map(|a| a.team_id.clone())
            .collect();

        let before = self.assignments.len();
        self.assignments
            .retain(|a| &a.initiative_id != initiative_id || desired.contains(&a.team_id));
        let removed = before - self.assignments.len();

        let mut added = 0;
        for team_id in desired {
            if !current.contains(team_id) {
                self.assignments.push(Assignment {
                    initiative_id: initiative_id.clone(),
                    team_id: team_id.clone(),
                });
                added += 1;
            }
        }
        debug!(initiative = %initiative_id, added, removed, "synced team assignments");
    }
}

/// Thread-safe handle to the persisted plan.
pub struct PlanStore {
    path: PathBuf,
    planning_year: i32,
    doc: RwLock<PlanDocument>,
}

impl PlanStore {
    /// Opens (or starts) the plan stored under `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let path = data_dir.as_ref().join(PLAN_FILE);
        let doc = read_document::<PlanDocument>(&path)?.unwrap_or_default();
        info!(
            path = %path.display(),
            initiatives = doc.initiatives.len(),
            schedules = doc.schedules.len(),
            "opened plan store"
        );
        Ok(Self {
            path,
            planning_year: DEFAULT_PLANNING_YEAR,
            doc: RwLock::new(doc),
        })
    }

    /// Sets the year applied to schedule writes that omit one.
    pub fn with_planning_year(mut self, year: i32) -> Self {
        self.planning_year = year;
        self
    }

    pub fn planning_year(&self) -> i32 {
        self.planning_year
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read<T>(&self, f: impl FnOnce(&PlanDocument) -> Result<T>) -> Result<T> {
        let doc = self
            .doc
            .read()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;
        f(&doc)
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut PlanDocument) -> Result<T>) -> Result<T> {
        let mut doc = self
            .doc
            .write()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;
        let mut next = doc.clone();
        let out = f(&mut next)?;
        write_document(&self.path, &next)?;
        *doc = next;
        Ok(out)
    }

    // --- perspectives -------------------------------------------------

    /// Returns true when no perspectives exist (fresh store).
    pub fn is_empty(&self) -> Result<bool> {
        self.read(|doc| Ok(doc.perspectives.is_empty()))
    }

    /// Inserts a perspective unless one with the same name exists.
    pub fn ensure_perspective(&self, perspective: Perspective) -> Result<PerspectiveId> {
        self.mutate(|doc| {
            if let Some(existing) = doc
                .perspectives
                .iter()
                .find(|p| p.name == perspective.name)
            {
                return Ok(existing.id.clone());
            }
            let id = perspective.id.clone();
            doc.perspectives.push(perspective);
            Ok(id)
        })
    }

    /// The nested fetch: perspectives → initiatives → schedule + teams,
    /// all in display order.
    pub fn gantt_data(&self) -> Result<Vec<PerspectiveView>> {
        self.read(|doc| {
            let mut perspectives: Vec<&Perspective> = doc.perspectives.iter().collect();
            perspectives.sort_by_key(|p| p.display_order);
            Ok(perspectives
                .into_iter()
                .map(|p| doc.perspective_view(p))
                .collect())
        })
    }

    pub fn get_perspective(&self, id: &PerspectiveId) -> Result<PerspectiveView> {
        self.read(|doc| Ok(doc.perspective_view(doc.perspective(id)?)))
    }

    // --- initiatives --------------------------------------------------

    pub fn list_initiatives(&self) -> Result<Vec<InitiativeView>> {
        self.read(|doc| {
            let mut initiatives: Vec<&Initiative> = doc.initiatives.iter().collect();
            initiatives.sort_by_key(|i| i.display_order);
            Ok(initiatives
                .into_iter()
                .map(|i| doc.initiative_view(i))
                .collect())
        })
    }

    pub fn get_initiative(&self, id: &InitiativeId) -> Result<InitiativeView> {
        self.read(|doc| Ok(doc.initiative_view(doc.initiative(id)?)))
    }

    pub fn create_initiative(&self, new: NewInitiative) -> Result<InitiativeView> {
        let code = validation::required_text("Code", &new.code, CODE_MAX_LEN)?;
        let name = validation::required_text("Name", &new.name, NAME_MAX_LEN)?;
        let target_kpi = validation::optional_text("target_kpi", new.target_kpi, TARGET_KPI_MAX_LEN)?;
        let estimated_effort =
            validation::optional_text("estimated_effort", new.estimated_effort, EFFORT_MAX_LEN)?;

        self.mutate(|doc| {
            doc.perspective(&new.perspective_id)?;
            doc.ensure_teams_exist(&new.team_ids)?;
            doc.ensure_unique_code(&code, None)?;

            let mut initiative = Initiative::new(new.perspective_id, code, name, new.display_order);
            initiative.description = new.description;
            initiative.target_kpi = target_kpi;
            initiative.estimated_effort = estimated_effort;
            initiative.priority = new.priority.unwrap_or_default();

            let id = initiative.id.clone();
            doc.initiatives.push(initiative);
            doc.sync_assignments(&id, &new.team_ids);
            info!(initiative = %id, "created initiative");

            Ok(doc.initiative_view(doc.initiative(&id)?))
        })
    }

    pub fn update_initiative(
        &self,
        id: &InitiativeId,
        update: InitiativeUpdate,
    ) -> Result<InitiativeView> {
        let code = update
            .code
            .map(|c| validation::required_text("Code", &c, CODE_MAX_LEN))
            .transpose()?;
        let name = update
            .name
            .map(|n| validation::required_text("Name", &n, NAME_MAX_LEN))
            .transpose()?;
        let target_kpi =
            validation::optional_text("target_kpi", update.target_kpi, TARGET_KPI_MAX_LEN)?;
        let estimated_effort =
            validation::optional_text("estimated_effort", update.estimated_effort, EFFORT_MAX_LEN)?;

        self.mutate(|doc| {
            if let Some(perspective_id) = &update.perspective_id {
                doc.perspective(perspective_id)?;
            }
            if let Some(team_ids) = &update.team_ids {
                doc.ensure_teams_exist(team_ids)?;
            }
            if let Some(code) = &code {
                doc.ensure_unique_code(code, Some(id))?;
            }

            let initiative = doc.initiative_mut(id)?;
            if let Some(code) = code {
                initiative.code = code;
            }
            if let Some(name) = name {
                initiative.name = name;
            }
            if let Some(perspective_id) = update.perspective_id {
                initiative.perspective_id = perspective_id;
            }
            if let Some(description) = update.description {
                initiative.description = Some(description);
            }
            if target_kpi.is_some() {
                initiative.target_kpi = target_kpi;
            }
            if estimated_effort.is_some() {
                initiative.estimated_effort = estimated_effort;
            }
            if let Some(priority) = update.priority {
                initiative.priority = priority;
            }
            if let Some(order) = update.display_order {
                initiative.display_order = order;
            }
            initiative.touch();

            if let Some(team_ids) = &update.team_ids {
                doc.sync_assignments(id, team_ids);
            }
            debug!(initiative = %id, "updated initiative");

            Ok(doc.initiative_view(doc.initiative(id)?))
        })
    }

    /// Deletes an initiative together with its schedule and assignments.
    pub fn delete_initiative(&self, id: &InitiativeId) -> Result<()> {
        self.mutate(|doc| {
            doc.initiative(id)?;
            doc.initiatives.retain(|i| &i.id != id);
            doc.schedules.retain(|s| &s.initiative_id != id);
            doc.assignments.retain(|a| &a.initiative_id != id);
            info!(initiative = %id, "deleted initiative");
            Ok(())
        })
    }

    // --- schedules ----------------------------------------------------

    pub fn list_schedules(&self) -> Result<Vec<ScheduleView>> {
        self.read(|doc| {
            let mut schedules: Vec<&Schedule> = doc.schedules.iter().collect();
            schedules.sort_by_key(|s| (s.start_month, s.end_month));
            schedules
                .into_iter()
                .map(|s| doc.schedule_view(s))
                .collect()
        })
    }

    pub fn get_schedule(&self, id: &ScheduleId) -> Result<ScheduleView> {
        self.read(|doc| {
            let schedule = doc
                .schedules
                .iter()
                .find(|s| &s.id == id)
                .ok_or_else(|| PersistenceError::not_found("schedule", id))?;
            doc.schedule_view(schedule)
        })
    }

    /// Creates the initiative's schedule or overwrites the existing one.
    pub fn upsert_schedule(
        &self,
        initiative_id: &InitiativeId,
        input: ScheduleInput,
    ) -> Result<Schedule> {
        input.validate()?;
        self.mutate(|doc| {
            doc.initiative(initiative_id)?;
            if let Some(existing) = doc
                .schedules
                .iter_mut()
                .find(|s| &s.initiative_id == initiative_id)
            {
                existing.overwrite(input);
                debug!(initiative = %initiative_id, start = existing.start_month, end = existing.end_month, "updated schedule");
                return Ok(existing.clone());
            }
            let schedule = Schedule::new(initiative_id.clone(), input);
            debug!(initiative = %initiative_id, schedule = %schedule.id, "created schedule");
            doc.schedules.push(schedule.clone());
            Ok(schedule)
        })
    }

    /// Creates a schedule for an initiative that has none.
    pub fn create_schedule(
        &self,
        initiative_id: &InitiativeId,
        input: ScheduleInput,
    ) -> Result<ScheduleView> {
        input.validate()?;
        self.mutate(|doc| {
            doc.initiative(initiative_id)?;
            if doc.schedule_for(initiative_id).is_some() {
                return Err(PersistenceError::Conflict(format!(
                    "Initiative {} already has a schedule",
                    initiative_id
                )));
            }
            let schedule = Schedule::new(initiative_id.clone(), input);
            doc.schedules.push(schedule.clone());
            doc.schedule_view(&schedule)
        })
    }

    pub fn update_schedule(&self, id: &ScheduleId, patch: SchedulePatch) -> Result<ScheduleView> {
        if let Some(year) = patch.year {
            validation::year(year as i64)?;
        }
        self.mutate(|doc| {
            let schedule = doc
                .schedules
                .iter_mut()
                .find(|s| &s.id == id)
                .ok_or_else(|| PersistenceError::not_found("schedule", id))?;
            schedule.apply_patch(&patch)?;
            let schedule = schedule.clone();
            doc.schedule_view(&schedule)
        })
    }

    pub fn delete_schedule(&self, id: &ScheduleId) -> Result<()> {
        self.mutate(|doc| {
            let before = doc.schedules.len();
            doc.schedules.retain(|s| &s.id != id);
            if doc.schedules.len() == before {
                return Err(PersistenceError::not_found("schedule", id));
            }
            debug!(schedule = %id, "deleted schedule");
            Ok(())
        })
    }

    /// Applies every patch or none. All patches are checked against the
    /// merged result before anything is written.
    pub fn bulk_update_schedules(&self, patches: Vec<BulkSchedulePatch>) -> Result<Vec<Schedule>> {
        if patches.is_empty() {
            return Ok(Vec::new());
        }
        for entry in &patches {
            if let Some(year) = entry.patch.year {
                validation::year(year as i64).map_err(|e| {
                    PersistenceError::Validation(format!("Schedule {}: {}", entry.id, e))
                })?;
            }
        }
        self.mutate(|doc| {
            let mut updated = Vec::with_capacity(patches.len());
            for entry in &patches {
                let schedule = doc
                    .schedules
                    .iter_mut()
                    .find(|s| s.id == entry.id)
                    .ok_or_else(|| PersistenceError::not_found("schedule", &entry.id))?;
                schedule.apply_patch(&entry.patch).map_err(|e| {
                    PersistenceError::Validation(format!("Schedule {}: {}", entry.id, e))
                })?;
                updated.push(schedule.clone());
            }
            info!(count = updated.len(), "bulk updated schedules");
            Ok(updated)
        })
    }

    // --- teams --------------------------------------------------------

    pub fn list_teams(&self) -> Result<Vec<TeamView>> {
        self.read(|doc| {
            let mut teams: Vec<&Team> = doc.teams.iter().collect();
            teams.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(teams.into_iter().map(|t| doc.team_view(t)).collect())
        })
    }

    pub fn get_team(&self, id: &TeamId) -> Result<TeamView> {
        self.read(|doc| Ok(doc.team_view(doc.team(id)?)))
    }

    pub fn create_team(&self, new: NewTeam) -> Result<Team> {
        let name = validation::required_text("Name", &new.name, TEAM_NAME_MAX_LEN)?;
        let color = validation::hex_color(&new.color)?;
        self.mutate(|doc| {
            doc.ensure_unique_team_name(&name, None)?;
            let team = Team::new(name, color);
            info!(team = %team.id, name = %team.name, "created team");
            doc.teams.push(team.clone());
            Ok(team)
        })
    }

    pub fn update_team(&self, id: &TeamId, update: TeamUpdate) -> Result<Team> {
        let name = update
            .name
            .map(|n| validation::required_text("Name", &n, TEAM_NAME_MAX_LEN))
            .transpose()?;
        let color = update
            .color
            .map(|c| validation::hex_color(&c))
            .transpose()?;
        self.mutate(|doc| {
            doc.team(id)?;
            if let Some(name) = &name {
                doc.ensure_unique_team_name(name, Some(id))?;
            }
            let team = doc
                .teams
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or_else(|| PersistenceError::not_found("team", id))?;
            if let Some(name) = name {
                team.name = name;
            }
            if let Some(color) = color {
                team.color = color;
            }
            team.updated_at = chrono::Utc::now();
            Ok(team.clone())
        })
    }

    /// Deletes a team that has no assigned initiatives.
    pub fn delete_team(&self, id: &TeamId) -> Result<()> {
        self.mutate(|doc| {
            doc.team(id)?;
            let assigned = doc.assignments.iter().filter(|a| &a.team_id == id).count();
            if assigned > 0 {
                return Err(PersistenceError::Conflict(format!(
                    "Cannot delete team. It has {} initiative(s) assigned. Please reassign or remove initiatives first.",
                    assigned
                )));
            }
            doc.teams.retain(|t| &t.id != id);
            info!(team = %id, "deleted team");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_models::Priority;
    use tempfile::tempdir;

    fn store_with_perspective() -> (tempfile::TempDir, PlanStore, PerspectiveId) {
        let dir = tempdir().unwrap();
        let store = PlanStore::open(dir.path()).unwrap();
        let pid = store
            .ensure_perspective(Perspective::new(
                "Financial", "#dbeafe", "#3b82f6", "#1e40af", 1,
            ))
            .unwrap();
        (dir, store, pid)
    }

    fn new_initiative(pid: &PerspectiveId, code: &str, order: i32) -> NewInitiative {
        NewInitiative {
            code: code.to_string(),
            name: format!("Initiative {code}"),
            perspective_id: pid.clone(),
            description: None,
            target_kpi: None,
            estimated_effort: None,
            priority: None,
            display_order: order,
            team_ids: Vec::new(),
        }
    }

    fn team(name: &str) -> NewTeam {
        NewTeam {
            name: name.to_string(),
            color: "#FF5733".to_string(),
        }
    }

    #[test]
    fn test_open_empty_store() {
        let dir = tempdir().unwrap();
        let store = PlanStore::open(dir.path()).unwrap();
        assert!(store.is_empty().unwrap());
        assert!(store.gantt_data().unwrap().is_empty());
        assert_eq!(store.planning_year(), DEFAULT_PLANNING_YEAR);
    }

    #[test]
    fn test_writes_survive_reopen() {
        let (dir, store, pid) = store_with_perspective();
        let created = store.create_initiative(new_initiative(&pid, "F1", 1)).unwrap();
        store
            .upsert_schedule(&created.initiative.id, ScheduleInput::new(2026, 2, 5))
            .unwrap();
        drop(store);

        let reopened = PlanStore::open(dir.path()).unwrap();
        let data = reopened.gantt_data().unwrap();
        let schedule = data[0].initiatives[0].schedule.as_ref().unwrap();
        assert_eq!((schedule.start_month, schedule.end_month), (2, 5));
    }

    #[test]
    fn test_gantt_data_orders_by_display_order() {
        let (_dir, store, pid) = store_with_perspective();
        store
            .ensure_perspective(Perspective::new("Customer", "#dcfce7", "#22c55e", "#166534", 2))
            .unwrap();
        store.create_initiative(new_initiative(&pid, "F2", 2)).unwrap();
        store.create_initiative(new_initiative(&pid, "F1", 1)).unwrap();

        let data = store.gantt_data().unwrap();
        assert_eq!(data[0].perspective.name, "Financial");
        assert_eq!(data[1].perspective.name, "Customer");
        let codes: Vec<&str> = data[0]
            .initiatives
            .iter()
            .map(|i| i.initiative.code.as_str())
            .collect();
        assert_eq!(codes, vec!["F1", "F2"]);
    }

    #[test]
    fn test_ensure_perspective_is_idempotent() {
        let (_dir, store, pid) = store_with_perspective();
        let again = store
            .ensure_perspective(Perspective::new("Financial", "#000000", "#000000", "#000000", 9))
            .unwrap();
        assert_eq!(again, pid);
        assert_eq!(store.gantt_data().unwrap().len(), 1);
    }

    #[test]
    fn test_create_initiative_validates_fields() {
        let (_dir, store, pid) = store_with_perspective();

        let mut bad = new_initiative(&pid, "", 1);
        assert!(matches!(
            store.create_initiative(bad.clone()),
            Err(PersistenceError::Validation(_))
        ));

        bad.code = "WAY-TOO-LONG".to_string();
        assert!(matches!(
            store.create_initiative(bad),
            Err(PersistenceError::Validation(_))
        ));

        let orphan = new_initiative(&PerspectiveId::new(), "X1", 1);
        assert!(matches!(
            store.create_initiative(orphan),
            Err(PersistenceError::NotFound { kind: "perspective", .. })
        ));
    }

    #[test]
    fn test_update_initiative_diffs_teams() {
        let (_dir, store, pid) = store_with_perspective();
        let a = store.create_team(team("Apps")).unwrap();
        let b = store.create_team(team("Infra")).unwrap();
        let c = store.create_team(team("Security")).unwrap();

        let mut new = new_initiative(&pid, "F1", 1);
        new.team_ids = vec![a.id.clone(), b.id.clone()];
        let created = store.create_initiative(new).unwrap();
        assert_eq!(created.teams.len(), 2);

        let update = InitiativeUpdate {
            team_ids: Some(vec![b.id.clone(), c.id.clone()]),
            priority: Some(Priority::High),
            ..Default::default()
        };
        let updated = store
            .update_initiative(&created.initiative.id, update)
            .unwrap();

        let names: Vec<&str> = updated.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Infra", "Security"]);
        assert_eq!(updated.initiative.priority, Priority::High);
        assert!(store.get_team(&a.id).unwrap().initiatives.is_empty());
    }

    #[test]
    fn test_duplicate_code_conflicts() {
        let (_dir, store, pid) = store_with_perspective();
        store.create_initiative(new_initiative(&pid, "F1", 1)).unwrap();
        let dup = store.create_initiative(new_initiative(&pid, "f1", 2));
        assert!(matches!(dup, Err(PersistenceError::Conflict(_))));
    }

    #[test]
    fn test_update_missing_initiative() {
        let (_dir, store, _pid) = store_with_perspective();
        let result = store.update_initiative(&InitiativeId::new(), InitiativeUpdate::default());
        assert!(matches!(result, Err(PersistenceError::NotFound { .. })));
    }

    #[test]
    fn test_delete_initiative_cascades() {
        let (_dir, store, pid) = store_with_perspective();
        let t = store.create_team(team("Apps")).unwrap();
        let mut new = new_initiative(&pid, "F1", 1);
        new.team_ids = vec![t.id.clone()];
        let created = store.create_initiative(new).unwrap();
        let id = created.initiative.id;
        store
            .upsert_schedule(&id, ScheduleInput::new(2026, 0, 1))
            .unwrap();

        store.delete_initiative(&id).unwrap();

        assert!(store.list_schedules().unwrap().is_empty());
        // Team is free to delete once the initiative is gone.
        store.delete_team(&t.id).unwrap();
    }

    #[test]
    fn test_upsert_schedule_creates_then_updates() {
        let (_dir, store, pid) = store_with_perspective();
        let id = store
            .create_initiative(new_initiative(&pid, "F1", 1))
            .unwrap()
            .initiative
            .id;

        let first = store
            .upsert_schedule(&id, ScheduleInput::new(2026, 2, 5))
            .unwrap();
        let second = store
            .upsert_schedule(&id, ScheduleInput::new(2026, 4, 7))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!((second.start_month, second.end_month), (4, 7));
        assert_eq!(store.list_schedules().unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_schedule_rejects_inverted_span() {
        let (_dir, store, pid) = store_with_perspective();
        let id = store
            .create_initiative(new_initiative(&pid, "F1", 1))
            .unwrap()
            .initiative
            .id;

        let err = store
            .upsert_schedule(&id, ScheduleInput::new(2026, 7, 4))
            .unwrap_err();
        assert_eq!(err.to_string(), "Start month must be <= end month");
        assert!(store.get_initiative(&id).unwrap().schedule.is_none());
    }

    #[test]
    fn test_upsert_schedule_unknown_initiative() {
        let (_dir, store, _pid) = store_with_perspective();
        let result = store.upsert_schedule(&InitiativeId::new(), ScheduleInput::new(2026, 0, 0));
        assert!(matches!(result, Err(PersistenceError::NotFound { kind: "initiative", .. })));
    }

    #[test]
    fn test_create_schedule_conflicts_when_present() {
        let (_dir, store, pid) = store_with_perspective();
        let id = store
            .create_initiative(new_initiative(&pid, "F1", 1))
            .unwrap()
            .initiative
            .id;
        store
            .create_schedule(&id, ScheduleInput::new(2026, 0, 0))
            .unwrap();
        let again = store.create_schedule(&id, ScheduleInput::new(2026, 1, 1));
        assert!(matches!(again, Err(PersistenceError::Conflict(_))));
    }

    #[test]
    fn test_update_and_delete_schedule() {
        let (_dir, store, pid) = store_with_perspective();
        let id = store
            .create_initiative(new_initiative(&pid, "F1", 1))
            .unwrap()
            .initiative
            .id;
        let schedule = store
            .upsert_schedule(&id, ScheduleInput::new(2026, 2, 5))
            .unwrap();

        let view = store
            .update_schedule(
                &schedule.id,
                SchedulePatch {
                    end_month: Some(8),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(view.schedule.end_month, 8);
        assert_eq!(view.initiative.code, "F1");
        assert_eq!(view.perspective.name, "Financial");

        store.delete_schedule(&schedule.id).unwrap();
        assert!(matches!(
            store.delete_schedule(&schedule.id),
            Err(PersistenceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_bulk_update_is_all_or_nothing() {
        let (_dir, store, pid) = store_with_perspective();
        let a = store.create_initiative(new_initiative(&pid, "F1", 1)).unwrap();
        let b = store.create_initiative(new_initiative(&pid, "F2", 2)).unwrap();
        let sa = store
            .upsert_schedule(&a.initiative.id, ScheduleInput::new(2026, 0, 2))
            .unwrap();
        let sb = store
            .upsert_schedule(&b.initiative.id, ScheduleInput::new(2026, 3, 5))
            .unwrap();

        let batch = vec![
            BulkSchedulePatch {
                id: sa.id.clone(),
                patch: SchedulePatch {
                    end_month: Some(4),
                    ..Default::default()
                },
            },
            BulkSchedulePatch {
                id: sb.id.clone(),
                patch: SchedulePatch {
                    start_month: Some(9),
                    end_month: Some(6),
                    ..Default::default()
                },
            },
        ];
        let err = store.bulk_update_schedules(batch).unwrap_err();
        assert!(err.to_string().contains("Start month must be <= end month"));

        // First patch was not applied either.
        let unchanged = store.get_schedule(&sa.id).unwrap();
        assert_eq!(unchanged.schedule.end_month, 2);

        let ok = vec![
            BulkSchedulePatch {
                id: sa.id.clone(),
                patch: SchedulePatch {
                    end_month: Some(4),
                    ..Default::default()
                },
            },
            BulkSchedulePatch {
                id: sb.id.clone(),
                patch: SchedulePatch {
                    start_month: Some(5),
                    ..Default::default()
                },
            },
        ];
        let updated = store.bulk_update_schedules(ok).unwrap();
        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].end_month, 4);
        assert_eq!(updated[1].start_month, 5);
    }

    #[test]
    fn test_team_crud_and_conflicts() {
        let (_dir, store, _pid) = store_with_perspective();
        let apps = store.create_team(team("Apps")).unwrap();

        assert!(matches!(
            store.create_team(team("apps")),
            Err(PersistenceError::Conflict(_))
        ));
        assert!(matches!(
            store.create_team(NewTeam {
                name: "Infra".to_string(),
                color: "red".to_string(),
            }),
            Err(PersistenceError::Validation(_))
        ));

        let renamed = store
            .update_team(
                &apps.id,
                TeamUpdate {
                    name: Some("Applications".to_string()),
                    color: None,
                },
            )
            .unwrap();
        assert_eq!(renamed.name, "Applications");
        assert_eq!(renamed.color, "#FF5733");

        store.delete_team(&apps.id).unwrap();
        assert!(store.list_teams().unwrap().is_empty());
    }

    #[test]
    fn test_delete_assigned_team_rejected() {
        let (_dir, store, pid) = store_with_perspective();
        let t = store.create_team(team("Apps")).unwrap();
        let mut new = new_initiative(&pid, "F1", 1);
        new.team_ids = vec![t.id.clone()];
        store.create_initiative(new).unwrap();

        let err = store.delete_team(&t.id).unwrap_err();
        assert!(matches!(err, PersistenceError::Conflict(_)));
        assert!(err.to_string().contains("1 initiative(s) assigned"));
    }

    #[test]
    fn test_teams_listed_by_name() {
        let (_dir, store, _pid) = store_with_perspective();
        store.create_team(team("Security")).unwrap();
        store.create_team(team("Apps")).unwrap();
        let names: Vec<String> = store
            .list_teams()
            .unwrap()
            .into_iter()
            .map(|t| t.team.name)
            .collect();
        assert_eq!(names, vec!["Apps", "Security"]);
    }
}
