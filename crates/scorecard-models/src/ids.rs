//! Type-safe ID wrappers for planner entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generates a prefixed-UUID identifier newtype.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix carried by every identifier of this kind.
            pub const PREFIX: &'static str = $prefix;

            /// Creates a new random ID.
            pub fn new() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::new_v4()))
            }

            /// Parses an identifier received from outside, rejecting anything
            /// that is not `<prefix>-<uuid>`.
            pub fn parse(s: &str) -> Option<Self> {
                let rest = s.strip_prefix($prefix)?.strip_prefix('-')?;
                Uuid::parse_str(rest).ok()?;
                Some(Self(s.to_string()))
            }

            /// Wraps a string without checking its shape (fixtures only).
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(PerspectiveId, "persp");
define_id!(InitiativeId, "init");
define_id!(ScheduleId, "sched");
define_id!(TeamId, "team");
