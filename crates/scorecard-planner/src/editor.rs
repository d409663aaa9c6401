//! Timeline editor session.
//!
//! [`GanttEditor`] owns the view state, the gesture state machine and one
//! autosave queue per initiative. Pointer events arrive in grid coordinates
//! (label column included); every move that changes a span is applied to
//! the view at once and handed to that initiative's queue.
//!
//! Background saves report back over a channel. Call
//! [`GanttEditor::poll_events`] from the owning loop to fold confirmations
//! into the view and collect user-facing notifications.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use scorecard_models::views::{find_by_code, find_initiative};
use scorecard_models::{InitiativeId, InitiativeView, PerspectiveView, Schedule, ScheduleInput};

use crate::autosave::{AutoSaveQueue, FailureHook, Saver};
use crate::client::ScheduleService;
use crate::config::EditorConfig;
use crate::drag::{hit_test, DragController, DragKind, MonthSpan};
use crate::error::{PlannerError, Result};
use crate::timeline::TimeAxis;
use crate::view_state::{ScheduleEntry, SchedulePartial, ViewState};

/// Prompt shown before a schedule is deleted.
pub const DELETE_PROMPT: &str = "Delete this schedule?";

/// Outcome of a background save.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    Saved(Schedule),
    SaveFailed {
        initiative_id: InitiativeId,
        message: String,
    },
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Success(msg) | Notification::Error(msg) => f.write_str(msg),
        }
    }
}

struct ScheduleSaver {
    service: Arc<dyn ScheduleService>,
    initiative_id: InitiativeId,
    events: mpsc::UnboundedSender<EditorEvent>,
}

#[async_trait]
impl Saver<ScheduleInput> for ScheduleSaver {
    async fn save(&self, input: ScheduleInput) -> Result<()> {
        let schedule = self
            .service
            .upsert_schedule(&self.initiative_id, &input)
            .await?;
        debug!(
            initiative = %self.initiative_id,
            start = schedule.start_month,
            end = schedule.end_month,
            "schedule saved"
        );
        // The editor may already be gone; nothing left to update then.
        let _ = self.events.send(EditorEvent::Saved(schedule));
        Ok(())
    }
}

/// An interactive editing session over the nested plan data.
pub struct GanttEditor {
    config: EditorConfig,
    axis: TimeAxis,
    service: Arc<dyn ScheduleService>,
    data: Vec<PerspectiveView>,
    view: ViewState,
    drag: DragController,
    /// Entry as it was at pointer-down, restored on cancel.
    snapshot: Option<ScheduleEntry>,
    queues: HashMap<InitiativeId, AutoSaveQueue<ScheduleInput>>,
    events_tx: mpsc::UnboundedSender<EditorEvent>,
    events_rx: mpsc::UnboundedReceiver<EditorEvent>,
    notices: Vec<Notification>,
}

impl GanttEditor {
    pub fn new(service: Arc<dyn ScheduleService>, config: EditorConfig) -> Self {
        let axis = TimeAxis::new(config.cell_width, config.label_width);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            view: ViewState::new(config.planning_year),
            drag: DragController::new(axis),
            axis,
            config,
            service,
            data: Vec::new(),
            snapshot: None,
            queues: HashMap::new(),
            events_tx,
            events_rx,
            notices: Vec::new(),
        }
    }

    /// Fetches the plan and builds the view.
    pub async fn load(&mut self) -> Result<()> {
        let data = self.service.fetch_gantt_data().await?;
        self.view.initialize(&data);
        info!(scheduled = self.view.len(), "timeline loaded");
        self.data = data;
        Ok(())
    }

    /// Refetches and discards optimistic state. Used after structural
    /// changes made elsewhere.
    pub async fn refresh(&mut self) -> Result<()> {
        let data = self.service.fetch_gantt_data().await?;
        self.view.reconcile_after_fetch(&data);
        self.data = data;
        Ok(())
    }

    /// Awaits a change to initiatives or teams and reconciles the timeline
    /// with the server afterwards.
    ///
    /// Success posts `success` and refetches. A server rejection is posted
    /// with the server's own message, anything else with `failure`. A
    /// not-found rejection also refetches, since the timeline is stale.
    pub async fn structural_change<T, Fut>(
        &mut self,
        success: &str,
        failure: &str,
        change: Fut,
    ) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match change.await {
            Ok(value) => {
                self.notices.push(Notification::Success(success.to_string()));
                self.refresh().await?;
                Ok(value)
            }
            Err(err) => {
                let message = match &err {
                    PlannerError::Api { message, .. } => message.clone(),
                    _ => failure.to_string(),
                };
                warn!(error = %err, "structural change failed");
                self.notices.push(Notification::Error(message));
                if err.is_not_found() {
                    if let Err(refresh_err) = self.refresh().await {
                        warn!(error = %refresh_err, "refetch after not-found failed");
                    }
                }
                Err(err)
            }
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn axis(&self) -> &TimeAxis {
        &self.axis
    }

    /// Data from the last fetch.
    pub fn data(&self) -> &[PerspectiveView] {
        &self.data
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current span of an initiative, optimistic changes included.
    pub fn span_of(&self, initiative_id: &InitiativeId) -> Option<MonthSpan> {
        self.view.get(initiative_id).map(ScheduleEntry::span)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&InitiativeView> {
        find_by_code(&self.data, code)
    }

    pub fn dragging(&self) -> Option<DragKind> {
        self.drag.session().map(|s| s.kind)
    }

    /// Starts a gesture on an initiative's row.
    ///
    /// On a scheduled row the bar must be under the pointer; the zone picks
    /// move or resize. On an unscheduled row the gesture draws a new bar.
    pub fn pointer_down(
        &mut self,
        initiative_id: &InitiativeId,
        grid_x: f64,
    ) -> Result<Option<DragKind>> {
        if find_initiative(&self.data, initiative_id).is_none() {
            return Err(PlannerError::UnknownInitiative(initiative_id.to_string()));
        }
        if self.drag.is_dragging() {
            return Ok(None);
        }
        let offset = self.axis.timeline_offset(grid_x);

        let started = match self.view.get(initiative_id) {
            Some(entry) => {
                let Some(zone) = hit_test(&self.axis, self.config.handle_width, entry.span(), offset)
                else {
                    return Ok(None);
                };
                self.snapshot = Some(entry.clone());
                self.drag.begin_bar_drag(
                    initiative_id.clone(),
                    zone,
                    offset,
                    entry.span(),
                    entry.year,
                )
            }
            None => {
                self.snapshot = None;
                self.drag
                    .begin_create(initiative_id.clone(), offset, self.config.planning_year)
            }
        };
        Ok(started.then(|| self.dragging()).flatten())
    }

    /// Feeds a pointer position to the active gesture. Returns the new span
    /// when it changed.
    pub fn pointer_move(&mut self, grid_x: f64) -> Result<Option<MonthSpan>> {
        let offset = self.axis.timeline_offset(grid_x);
        let Some(update) = self.drag.pointer_move(offset) else {
            return Ok(None);
        };
        if let Some(entry) = self.view.get(&update.initiative_id) {
            if entry.span() == update.span && entry.year == update.year {
                return Ok(None);
            }
        }

        let input = self
            .view
            .apply_optimistic(
                &update.initiative_id,
                SchedulePartial::span(update.year, update.span),
            )
            .to_input();
        self.queue_for(&update.initiative_id).schedule(input)?;
        Ok(Some(update.span))
    }

    /// Ends the gesture. Pending saves fire on their own timer; call
    /// [`GanttEditor::flush`] for an immediate write.
    pub fn pointer_up(&mut self) -> Option<DragKind> {
        self.snapshot = None;
        self.drag.pointer_up().map(|session| session.kind)
    }

    /// Abandons the gesture and puts the schedule back as it was at
    /// pointer-down.
    pub async fn cancel_drag(&mut self) -> Result<bool> {
        let Some(session) = self.drag.cancel() else {
            return Ok(false);
        };
        let snapshot = self.snapshot.take();
        if session.last.is_none() {
            return Ok(true);
        }

        let id = session.initiative_id;
        self.settle(&id).await?;
        match snapshot {
            Some(entry) => {
                // A timer may have fired mid-gesture; write the original back.
                let span = entry.span();
                let year = entry.year;
                self.view.restore(&id, Some(entry));
                let input = self
                    .view
                    .apply_optimistic(&id, SchedulePartial::span(year, span))
                    .to_input();
                self.queue_for(&id).schedule(input)?;
            }
            None => {
                let created = self.view.remove(&id).and_then(|e| e.schedule_id);
                if let Some(schedule_id) = created {
                    self.service.delete_schedule(&schedule_id).await?;
                }
            }
        }
        debug!(initiative = %id, "drag cancelled");
        Ok(true)
    }

    /// Writes the pending change for one initiative now.
    pub async fn flush(&mut self, initiative_id: &InitiativeId) -> Result<bool> {
        let result = match self.queues.get(initiative_id) {
            Some(queue) => queue.flush().await,
            None => return Ok(false),
        };
        self.apply_events();
        if let Err(err) = &result {
            warn!(initiative = %initiative_id, error = %err, "flush failed");
            self.view.mark_unconfirmed(initiative_id);
        }
        result
    }

    /// Flushes every queue. All queues are attempted; the first error is
    /// returned. Yields the number of saves written.
    pub async fn flush_all(&mut self) -> Result<usize> {
        let ids: Vec<InitiativeId> = self.queues.keys().cloned().collect();
        let mut written = 0;
        let mut first_err = None;
        for id in ids {
            match self.flush(&id).await {
                Ok(true) => written += 1,
                Ok(false) => {}
                Err(err) => {
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(written),
        }
    }

    /// Removes an initiative's schedule after `confirm` approves
    /// [`DELETE_PROMPT`]. Returns false when there was nothing to delete or
    /// the user declined.
    pub async fn delete_schedule<F>(
        &mut self,
        initiative_id: &InitiativeId,
        confirm: F,
    ) -> Result<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        self.apply_events();
        if self.view.get(initiative_id).is_none() || !confirm(DELETE_PROMPT) {
            return Ok(false);
        }

        self.settle(initiative_id).await?;
        let schedule_id = self
            .view
            .get(initiative_id)
            .and_then(|entry| entry.schedule_id.clone());
        if let Some(schedule_id) = schedule_id {
            match self.service.delete_schedule(&schedule_id).await {
                Ok(()) => {}
                Err(err) if err.is_not_found() => {
                    debug!(schedule = %schedule_id, "schedule already gone");
                }
                Err(err) => {
                    self.notices
                        .push(Notification::Error("Failed to delete schedule".to_string()));
                    return Err(err);
                }
            }
        }
        self.view.remove(initiative_id);
        self.notices
            .push(Notification::Success("Schedule deleted".to_string()));
        info!(initiative = %initiative_id, "schedule deleted");
        Ok(true)
    }

    /// Applies finished background saves to the view and returns the
    /// notifications raised since the last call.
    pub fn poll_events(&mut self) -> Vec<Notification> {
        self.apply_events();
        std::mem::take(&mut self.notices)
    }

    /// True while any change is waiting or being written.
    pub fn is_saving(&self) -> bool {
        self.queues.values().any(AutoSaveQueue::is_saving)
    }

    /// Drops the pending save for an initiative about to be reverted or
    /// removed and waits out one that is already running, so the server id
    /// of a just-created schedule is known. That save is not announced.
    async fn settle(&mut self, initiative_id: &InitiativeId) -> Result<()> {
        if let Some(queue) = self.queues.get(initiative_id) {
            queue.discard()?;
            queue.wait_idle().await?;
        }
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                EditorEvent::Saved(schedule) if &schedule.initiative_id == initiative_id => {
                    self.view.confirm_saved(&schedule);
                }
                other => self.handle_event(other),
            }
        }
        Ok(())
    }

    fn apply_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::Saved(schedule) => {
                self.view.confirm_saved(&schedule);
                self.notices
                    .push(Notification::Success("Changes saved".to_string()));
            }
            EditorEvent::SaveFailed {
                initiative_id,
                message,
            } => {
                self.view.mark_unconfirmed(&initiative_id);
                self.notices.push(Notification::Error(format!(
                    "Failed to save changes: {}",
                    message
                )));
            }
        }
    }

    fn queue_for(&mut self, initiative_id: &InitiativeId) -> &AutoSaveQueue<ScheduleInput> {
        let service = &self.service;
        let events = &self.events_tx;
        let delay = self.config.autosave_delay;
        self.queues
            .entry(initiative_id.clone())
            .or_insert_with(|| {
                let saver = Arc::new(ScheduleSaver {
                    service: Arc::clone(service),
                    initiative_id: initiative_id.clone(),
                    events: events.clone(),
                });
                let failed_tx = events.clone();
                let failed_id = initiative_id.clone();
                let hook: FailureHook = Arc::new(move |err: &PlannerError| {
                    let _ = failed_tx.send(EditorEvent::SaveFailed {
                        initiative_id: failed_id.clone(),
                        message: err.to_string(),
                    });
                });
                AutoSaveQueue::new(delay, saver).with_failure_hook(hook)
            })
    }
}
