//! # Bridge Pipeline
//!
//! Startup sequence:
//!
//! 1. Validate the deduplication settings
//! 2. Register Prometheus metrics
//! 3. Build the shared detector with the Prometheus recorder
//! 4. Spawn the ingest task between the queue and the downstream sink
//!
//! Listeners then call [`BridgePipeline::attach_interface`] once per bridged
//! interface and push raw frames through the returned sender.

use anyhow::{Context, Result};
use bridge_telemetry::log_detector_event;
use bus_types::InterfaceId;
use cb_01_frame_dedup::adapters::ingest;
use cb_01_frame_dedup::{
    FrameSink, IngestHandle, IngestReport, InterfaceSender, SharedDuplicateDetector, TimeBase,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::adapters::PrometheusRecorder;
use crate::config::RuntimeConfig;

/// Running bridge: one detector, one ingest task.
pub struct BridgePipeline {
    detector: SharedDuplicateDetector,
    handle: IngestHandle,
    task: JoinHandle<IngestReport>,
}

impl BridgePipeline {
    /// Start the pipeline on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails on invalid deduplication settings or if the metrics registry
    /// rejects a collector.
    pub fn start<S>(config: &RuntimeConfig, sink: S) -> Result<Self>
    where
        S: FrameSink + 'static,
    {
        // Ingested frames carry their own arrival stamps.
        let dedup = config
            .into_dedup_config()
            .context("invalid deduplication settings")?
            .with_time_base(TimeBase::FrameArrival);

        bridge_telemetry::register_metrics().context("failed to register metrics")?;

        let detector = SharedDuplicateDetector::new(dedup.clone())?
            .with_metrics(Arc::new(PrometheusRecorder::new()));

        let (handle, adapter) = ingest::channel(detector.clone(), sink, config.ingest_queue);
        let task = tokio::spawn(adapter.run());

        log_detector_event!(
            info,
            "Bridge pipeline started",
            window_ms = dedup.window_ms,
            max_cache_size = dedup.max_cache_size,
            ingest_queue = config.ingest_queue
        );

        Ok(Self {
            detector,
            handle,
            task,
        })
    }

    /// Sender for one bridged interface.
    pub fn attach_interface(&self, name: impl Into<InterfaceId>) -> InterfaceSender {
        let sender = self.handle.sender_for(name);
        info!(interface = %sender.interface(), "Interface attached");
        sender
    }

    /// Shared detector handle (stats, reset, sweeps).
    pub fn detector(&self) -> SharedDuplicateDetector {
        self.detector.clone()
    }

    /// Stop accepting new interfaces and wait for the ingest task.
    ///
    /// Completes once every [`InterfaceSender`] handed out has been dropped
    /// and the queue is drained, or the sink has closed.
    pub async fn shutdown(self) -> Result<IngestReport> {
        drop(self.handle);
        let report = self.task.await.context("ingest task failed")?;
        log_detector_event!(
            info,
            "Bridge pipeline stopped",
            received = report.received,
            forwarded = report.forwarded,
            suppressed = report.suppressed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ChannelSink;

    fn config(window_ms: u64, max_cache_size: usize) -> RuntimeConfig {
        RuntimeConfig {
            window_ms,
            max_cache_size,
            ingest_queue: 16,
            ..RuntimeConfig::recommended()
        }
    }

    #[tokio::test]
    async fn test_bridged_copies_forwarded_once() {
        let (sink, mut rx) = ChannelSink::new(16);
        let pipeline = BridgePipeline::start(&config(50, 64), sink).unwrap();

        let can0 = pipeline.attach_interface("can0");
        let can1 = pipeline.attach_interface("can1");

        can0.send(0x0CF00400, &[0xF0, 0x7D], 1_000).await.unwrap();
        can1.send(0x0CF00400, &[0xF0, 0x7D], 1_002).await.unwrap();
        can1.send(0x18FEF100, &[0x00], 1_003).await.unwrap();
        can0.send(0x18FEF100, &[0x00], 1_004).await.unwrap();
        drop(can0);
        drop(can1);

        let detector = pipeline.detector();
        let report = pipeline.shutdown().await.unwrap();
        assert_eq!(report.received, 4);
        assert_eq!(report.forwarded, 2);
        assert_eq!(report.suppressed, 2);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.interface.as_str(), "can0");
        let second = rx.recv().await.unwrap();
        assert_eq!(second.interface.as_str(), "can1");
        assert!(rx.recv().await.is_none());

        assert_eq!(detector.stats().duplicates_suppressed, 2);
    }

    #[tokio::test]
    async fn test_detector_handle_shares_arrival_time() {
        let (sink, _rx) = ChannelSink::new(16);
        let pipeline = BridgePipeline::start(&config(50, 64), sink).unwrap();
        let detector = pipeline.detector();
        assert_eq!(detector.config().time_base, TimeBase::FrameArrival);

        let can0 = pipeline.attach_interface("can0");
        can0.send(0x321, &[7], 1_000_000).await.unwrap();
        drop(can0);
        pipeline.shutdown().await.unwrap();

        // Queried at the latest arrival, not at process uptime.
        assert!(detector.is_duplicate(0x321, &[7]).unwrap());
        assert_eq!(detector.sweep(1_000_100), 1);
        assert!(!detector.is_duplicate(0x321, &[7]).unwrap());
    }

    #[tokio::test]
    async fn test_invalid_config_fails_start() {
        let (sink, _rx) = ChannelSink::new(1);
        assert!(BridgePipeline::start(&config(0, 64), sink).is_err());
    }

    #[tokio::test]
    async fn test_closed_downstream_ends_ingest() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);
        let pipeline = BridgePipeline::start(&config(50, 64), sink).unwrap();
        let can0 = pipeline.attach_interface("can0");

        can0.send(0x1, &[1], 0).await.unwrap();
        let report = pipeline.shutdown().await.unwrap();
        assert_eq!(report.forwarded, 0);
        assert_eq!(report.received, 1);
    }
}
