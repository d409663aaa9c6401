//! Timeline editor core for the scorecard planner.
//!
//! The pieces, leaves first:
//! - [`timeline`]: pixel offsets to month indices and quarters
//! - [`autosave`]: single-slot debounced save queue
//! - [`drag`]: the create/move/resize gesture state machine
//! - [`view_state`]: the local initiative → schedule mapping
//! - [`editor`]: a session wiring those to a [`ScheduleService`]
//!
//! [`ApiClient`] implements [`ScheduleService`] over HTTP; [`export`] turns
//! fetched data into JSON, CSV or SVG.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use scorecard_planner::{ApiClient, EditorConfig, GanttEditor};
//!
//! # async fn run() -> scorecard_planner::Result<()> {
//! let client = Arc::new(ApiClient::new("http://localhost:3001/api"));
//! let mut editor = GanttEditor::new(client, EditorConfig::default());
//! editor.load().await?;
//!
//! let id = editor.find_by_code("F1").map(|i| i.initiative.id.clone());
//! if let Some(id) = id {
//!     editor.pointer_down(&id, 260.0)?;
//!     editor.pointer_move(500.0)?;
//!     editor.pointer_up();
//!     editor.flush(&id).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod autosave;
pub mod client;
pub mod config;
pub mod drag;
pub mod editor;
pub mod error;
pub mod export;
pub mod timeline;
pub mod view_state;

pub use autosave::{AutoSaveQueue, FailureHook, Saver};
pub use client::{ApiClient, Health, ScheduleService, API_URL_ENV, DEFAULT_API_URL};
pub use config::{EditorConfig, DEFAULT_AUTOSAVE_DELAY, DEFAULT_PLANNING_YEAR};
pub use drag::{DragController, DragKind, DragSession, DragState, DragUpdate, HitZone, MonthSpan};
pub use editor::{EditorEvent, GanttEditor, Notification, DELETE_PROMPT};
pub use error::{PlannerError, Result};
pub use export::{ExportFormat, ROWS_PER_PAGE};
pub use timeline::{clamp_month, month_index_from_offset, quarter_of, TimeAxis};
pub use view_state::{ScheduleEntry, SchedulePartial, SyncState, ViewState};
