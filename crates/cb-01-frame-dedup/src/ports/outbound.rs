//! Outbound Ports (Driven Ports)
//!
//! Dependencies the filter needs from its host: a time source, a metrics
//! sink and somewhere to deliver frames that survive deduplication.

use async_trait::async_trait;
use bus_types::CanFrame;

use crate::error::SinkError;

pub use crate::domain::Clock;
pub use crate::metrics::MetricsRecorder;

/// Downstream consumer of forwarded frames (Driven Port)
///
/// Receives each logical frame at most once per window.
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Deliver one forwarded frame
    ///
    /// Returning [`SinkError::Closed`] stops the ingest loop.
    async fn deliver(&self, frame: CanFrame) -> Result<(), SinkError>;
}
