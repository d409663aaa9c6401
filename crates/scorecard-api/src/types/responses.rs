//! Response DTOs for the API.
//!
//! Most endpoints return the model views from `scorecard_models` directly.

use serde::Serialize;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Current server time, RFC 3339.
    pub timestamp: String,
}
