//! # Bridge Runtime Library
//!
//! Wires the frame deduplication subsystem into a running bridge.
//!
//! ## Modules
//!
//! - `config/` - environment-driven [`RuntimeConfig`]
//! - `adapters/` - Prometheus metrics recorder and channel sink
//! - `pipeline/` - detector plus ingest task, one sender per interface
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_runtime::{BridgePipeline, ChannelSink, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_env()?;
//! bridge_telemetry::init_telemetry(&config.telemetry)?;
//!
//! let (sink, mut downstream) = ChannelSink::new(1024);
//! let pipeline = BridgePipeline::start(&config, sink)?;
//! let can0 = pipeline.attach_interface("can0");
//! let can1 = pipeline.attach_interface("can1");
//! ```

pub mod adapters;
pub mod config;
pub mod pipeline;

pub use adapters::{ChannelSink, PrometheusRecorder};
pub use config::{ConfigError, RuntimeConfig, DEFAULT_INGEST_QUEUE};
pub use pipeline::BridgePipeline;
