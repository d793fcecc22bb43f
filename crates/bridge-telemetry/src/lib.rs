//! # Bridge Telemetry
//!
//! Logging and metrics for the bus bridge.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an `EnvFilter` and a pretty or
//!   JSON fmt layer
//! - **Metrics**: Prometheus registry with deduplication and ingest series,
//!   encoded in the text exposition format
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Frames, decisions and evictions are now logged and counted
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `canbridge` | Service name in logs |
//! | `CB_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `CB_JSON_LOGS` | `false` | JSON log lines (true inside containers) |
//! | `CB_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `CB_METRICS_PORT` | `9100` | Port for the host's `/metrics` endpoint |

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, DEDUP_CACHE_SIZE, DEDUP_CHECK_DURATION,
    DEDUP_DUPLICATES_SUPPRESSED, DEDUP_ENTRIES_EVICTED, DEDUP_ENTRIES_EXPIRED,
    DEDUP_FRAMES_ACCEPTED, DEDUP_FRAMES_CHECKED, INGEST_FRAMES_REJECTED,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the global log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    // Initialize metrics first so early decisions are counted
    register_metrics()?;
    init_tracing(config)
}
