//! Delivery teams.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::TeamId;

/// Maximum length of a team name.
pub const TEAM_NAME_MAX_LEN: usize = 100;

/// A labeled, coloured group that can be assigned to many initiatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// `#RRGGBB`.
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TeamId::new(),
            name: name.into(),
            color: color.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields for creating a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub color: String,
}

/// A partial team update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
