//! Editor configuration.

use std::time::Duration;

use crate::timeline::{DEFAULT_CELL_WIDTH, DEFAULT_HANDLE_WIDTH, DEFAULT_LABEL_WIDTH};

/// Planning year used when none is configured.
pub const DEFAULT_PLANNING_YEAR: i32 = 2026;

/// Quiet period before a schedule change is written.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

/// Geometry and timing for a timeline editor session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Width of one month cell, in pixels.
    pub cell_width: f64,
    /// Width of the initiative label column left of the timeline.
    pub label_width: f64,
    /// Width of each resize handle at the ends of a bar.
    pub handle_width: f64,
    /// Year given to schedules created by dragging.
    pub planning_year: i32,
    pub autosave_delay: Duration,
}

impl EditorConfig {
    pub fn with_planning_year(mut self, year: i32) -> Self {
        self.planning_year = year;
        self
    }

    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            label_width: DEFAULT_LABEL_WIDTH,
            handle_width: DEFAULT_HANDLE_WIDTH,
            planning_year: DEFAULT_PLANNING_YEAR,
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
        }
    }
}
