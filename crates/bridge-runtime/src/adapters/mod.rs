//! Adapters Layer
//!
//! Implementations of the deduplication crate's driven ports.
//!
//! ## Adapters
//!
//! - `PrometheusRecorder` - `MetricsRecorder` backed by the telemetry registry
//! - `ChannelSink` - `FrameSink` feeding a tokio channel for downstream decoders

pub mod channel_sink;
pub mod prometheus;

pub use channel_sink::ChannelSink;
pub use self::prometheus::PrometheusRecorder;
