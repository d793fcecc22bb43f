//! Ingest adapter: bridged interfaces -> detector -> downstream sink
//!
//! Every listener gets an [`InterfaceSender`] feeding one bounded queue, so
//! frames reach the detector in a single serialized order regardless of how
//! many interfaces are bridged. The [`IngestAdapter`] drains the queue,
//! forwards the first copy of each frame and drops the rest.
//!
//! Frames are judged by their arrival stamps only when the detector runs on
//! [`TimeBase::FrameArrival`](crate::domain::TimeBase::FrameArrival).
//!
//! ```ignore
//! let config = DedupConfig::recommended().with_time_base(TimeBase::FrameArrival);
//! let detector = SharedDuplicateDetector::new(config)?;
//! let (handle, adapter) = ingest::channel(detector, sink, 1024);
//!
//! let can0 = handle.sender_for("can0");
//! let can1 = handle.sender_for("can1");
//! let task = tokio::spawn(adapter.run());
//!
//! can0.send(0x18FEF100, &[0x01, 0x02], now_ms).await?;
//! ```

use bus_types::{CanFrame, InterfaceId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::domain::{Clock, MonotonicClock};
use crate::error::{IngestError, SinkError};
use crate::metrics::MetricsRecorder;
use crate::ports::FrameSink;
use crate::service::SharedDuplicateDetector;

/// Counters for one ingest run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Frames taken off the queue
    pub received: u64,
    /// Frames delivered downstream
    pub forwarded: u64,
    /// Frames dropped as duplicates
    pub suppressed: u64,
    /// Deliveries the sink rejected
    pub sink_errors: u64,
}

/// Create the ingest queue.
///
/// Returns the handle that hands out per-interface senders and the adapter
/// that must be run to drain the queue.
pub fn channel<S, C>(
    detector: SharedDuplicateDetector<C>,
    sink: S,
    capacity: usize,
) -> (IngestHandle, IngestAdapter<S, C>)
where
    S: FrameSink,
    C: Clock,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = IngestHandle {
        tx,
        metrics: detector.metrics(),
    };
    let adapter = IngestAdapter { detector, sink, rx };
    (handle, adapter)
}

/// Producer side of the ingest queue.
#[derive(Clone)]
pub struct IngestHandle {
    tx: mpsc::Sender<CanFrame>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl IngestHandle {
    /// Sender that stamps frames with `interface`.
    pub fn sender_for(&self, interface: impl Into<InterfaceId>) -> InterfaceSender {
        let interface = interface.into();
        debug!(interface = %interface, "Interface attached to ingest queue");
        InterfaceSender {
            interface,
            tx: self.tx.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

/// Per-interface producer.
#[derive(Clone)]
pub struct InterfaceSender {
    interface: InterfaceId,
    tx: mpsc::Sender<CanFrame>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl InterfaceSender {
    pub fn interface(&self) -> &InterfaceId {
        &self.interface
    }

    /// Validate and enqueue a raw frame.
    ///
    /// # Errors
    ///
    /// `InvalidFrame` when the id or payload breaks the bus contract (the
    /// frame never reaches the detector), `QueueClosed` once the adapter
    /// has stopped.
    pub async fn send(
        &self,
        raw_id: u32,
        payload: &[u8],
        timestamp_ms: u64,
    ) -> Result<(), IngestError> {
        let frame = CanFrame::new(raw_id, payload, timestamp_ms, self.interface.clone())
            .map_err(|e| {
                warn!(
                    interface = %self.interface,
                    raw_id,
                    error = %e,
                    "Rejected frame at ingress"
                );
                self.metrics.record_rejected();
                e
            })?;
        self.send_frame(frame).await
    }

    /// Enqueue an already validated frame.
    pub async fn send_frame(&self, frame: CanFrame) -> Result<(), IngestError> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| IngestError::QueueClosed)
    }
}

/// Consumer side: detector in front of the sink.
pub struct IngestAdapter<S, C = MonotonicClock>
where
    C: Clock,
{
    detector: SharedDuplicateDetector<C>,
    sink: S,
    rx: mpsc::Receiver<CanFrame>,
}

impl<S, C> IngestAdapter<S, C>
where
    S: FrameSink,
    C: Clock,
{
    pub fn detector(&self) -> &SharedDuplicateDetector<C> {
        &self.detector
    }

    /// Drain the queue until every sender is dropped or the sink closes.
    pub async fn run(mut self) -> IngestReport {
        info!("[IngestAdapter] Started");
        let mut report = IngestReport::default();

        while let Some(frame) = self.rx.recv().await {
            report.received += 1;

            if self.detector.check_frame(&frame) {
                report.suppressed += 1;
                trace!(
                    interface = %frame.interface,
                    arbitration_id = %frame.id,
                    "Duplicate dropped"
                );
                continue;
            }

            match self.sink.deliver(frame).await {
                Ok(()) => report.forwarded += 1,
                Err(SinkError::Closed) => {
                    warn!("[IngestAdapter] Downstream closed, stopping");
                    break;
                }
                Err(e) => {
                    report.sink_errors += 1;
                    warn!(error = %e, "Downstream rejected frame");
                }
            }
        }

        info!(
            received = report.received,
            forwarded = report.forwarded,
            suppressed = report.suppressed,
            sink_errors = report.sink_errors,
            "[IngestAdapter] Stopped"
        );
        report
    }
}
