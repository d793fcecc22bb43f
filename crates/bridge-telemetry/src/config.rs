//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for logging and metrics exposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to logs
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive such as `cb_01_frame_dedup=trace,info`
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Port a host process should serve `/metrics` on
    pub metrics_port: u16,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "canbridge".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            metrics_port: 9100,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: canbridge)
    /// - `CB_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `CB_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `CB_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `CB_METRICS_PORT`: Prometheus metrics port (default: 9100)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("CB_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: lookup("CB_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.console_output),

            json_logs: lookup("CB_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            metrics_port: lookup("CB_METRICS_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metrics_port),
        }
    }
}
