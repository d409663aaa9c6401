//! Server settings.

use std::time::{Duration, Instant};

/// Port the planner web client talks to by default.
pub const DEFAULT_PORT: u16 = 3001;

const ANY_ORIGIN: &str = "*";

/// Where the planner API listens and which browsers may call it.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Origins sent back in CORS responses. Empty or `"*"` means any.
    pub cors_origins: Vec<String>,
    started: Instant,
}

impl ApiConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            cors_origins: vec![ANY_ORIGIN.to_string()],
            started: Instant::now(),
        }
    }

    /// Restricts CORS to the given origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// `host:port` string handed to the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == ANY_ORIGIN)
    }

    /// Time since the config was built, i.e. since server start.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listens_locally_on_planner_port() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:3001");
        assert!(config.allows_any_origin());
        assert!(config.uptime() < Duration::from_secs(5));
    }

    #[test]
    fn test_cors_restriction() {
        let config = ApiConfig::new("0.0.0.0", 8080)
            .with_cors_origins(vec!["http://localhost:5173".to_string()]);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(!config.allows_any_origin());

        let open = config.with_cors_origins(vec![]);
        assert!(open.allows_any_origin());
    }
}
