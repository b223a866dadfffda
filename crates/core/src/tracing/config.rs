//! Configuration for tracing and instrumentation

use serde::{Deserialize, Serialize};

/// Main instrumentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentationConfig {
    /// Service name attached to log output
    pub service_name: String,
    /// Log level filter (e.g., "info", "debug", "sc_login_auth=trace")
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            service_name: "sc-login".to_string(),
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl InstrumentationConfig {
    /// Create configuration from environment variables
    ///
    /// Supports the following environment variables:
    /// - `SERVICE_NAME`: Service name
    /// - `RUST_LOG`: Log level filter
    /// - `SC_LOGIN_LOG_JSON`: `1` or `true` for JSON output
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service_name: std::env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            json: matches!(
                std::env::var("SC_LOGIN_LOG_JSON").as_deref(),
                Ok("1") | Ok("true")
            ),
        }
    }

    /// Override the log level filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
