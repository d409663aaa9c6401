//! Initiatives: the trackable units of work under a perspective.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{InitiativeId, PerspectiveId, TeamId};

/// Maximum length of an initiative code.
pub const CODE_MAX_LEN: usize = 10;
/// Maximum length of an initiative name.
pub const NAME_MAX_LEN: usize = 255;
/// Maximum length of the target KPI text.
pub const TARGET_KPI_MAX_LEN: usize = 100;
/// Maximum length of the estimated effort text.
pub const EFFORT_MAX_LEN: usize = 50;

/// Priority of an initiative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Parses a priority name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// A stored initiative row. Schedule and team assignments live in their
/// own tables and are joined in [`crate::InitiativeView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initiative {
    pub id: InitiativeId,
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub perspective_id: PerspectiveId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_kpi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_effort: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Initiative {
    pub fn new(
        perspective_id: PerspectiveId,
        code: impl Into<String>,
        name: impl Into<String>,
        display_order: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: InitiativeId::new(),
            code: code.into(),
            name: name.into(),
            description: None,
            perspective_id,
            target_kpi: None,
            estimated_effort: None,
            priority: Priority::default(),
            display_order,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Bumps `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Fields for creating an initiative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInitiative {
    pub code: String,
    pub name: String,
    pub perspective_id: PerspectiveId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_kpi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_effort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub display_order: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<TeamId>,
}

/// A partial initiative update. `team_ids`, when present, is the complete
/// desired assignment; the store applies only the difference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perspective_id: Option<PerspectiveId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_kpi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_effort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_ids: Option<Vec<TeamId>>,
}
