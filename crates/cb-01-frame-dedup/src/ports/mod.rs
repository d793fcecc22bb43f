//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for listener threads and the runtime
//! - Driven Ports (outbound) - time source, metrics and downstream delivery

pub mod inbound;
pub mod outbound;

pub use inbound::DuplicateFilterApi;
pub use outbound::{Clock, FrameSink, MetricsRecorder};
