//! Balanced-scorecard perspectives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::PerspectiveId;

/// One of the four fixed top-level groupings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective {
    pub id: PerspectiveId,
    pub name: String,
    /// Row background colour.
    pub color_bg: String,
    /// Schedule bar colour.
    pub color_bar: String,
    /// Group header colour.
    pub color_header: String,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

impl Perspective {
    pub fn new(
        name: impl Into<String>,
        color_bg: impl Into<String>,
        color_bar: impl Into<String>,
        color_header: impl Into<String>,
        display_order: i32,
    ) -> Self {
        Self {
            id: PerspectiveId::new(),
            name: name.into(),
            color_bg: color_bg.into(),
            color_bar: color_bar.into(),
            color_header: color_header.into(),
            display_order,
            created_at: Utc::now(),
        }
    }
}
