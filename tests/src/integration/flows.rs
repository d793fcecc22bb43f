//! # Integration Test Flows
//!
//! Tests that bus-types, cb-01-frame-dedup and bridge-runtime work together:
//!
//! 1. **Listeners -> Pipeline -> Sink**: every bridged copy of a frame is
//!    forwarded exactly once
//! 2. **Concurrent listeners**: interface tasks on a multi-threaded runtime
//!    never double-forward
//! 3. **Capacity over window**: the documented eviction scenario through the
//!    public API
//! 4. **Metrics exposition**: pipeline decisions show up in the Prometheus
//!    text output

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use bridge_runtime::{BridgePipeline, ChannelSink, RuntimeConfig};
    use bus_types::{ArbitrationId, CanFrame};
    use cb_01_frame_dedup::adapters::ingest;
    use cb_01_frame_dedup::{
        DedupConfigBuilder, DuplicateFilterApi, FrameSink, LedgerPolicy, ManualClock, Metrics,
        SharedDuplicateDetector, SinkError, TimeBase,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Sink that records every forwarded frame
    #[derive(Clone, Default)]
    struct RecordingSink {
        frames: Arc<Mutex<Vec<CanFrame>>>,
    }

    #[async_trait]
    impl FrameSink for RecordingSink {
        async fn deliver(&self, frame: CanFrame) -> Result<(), SinkError> {
            self.frames.lock().push(frame);
            Ok(())
        }
    }

    fn runtime_config(window_ms: u64, max_cache_size: usize) -> RuntimeConfig {
        RuntimeConfig {
            window_ms,
            max_cache_size,
            ingest_queue: 256,
            ..RuntimeConfig::recommended()
        }
    }

    // =============================================================================
    // LISTENERS -> PIPELINE -> SINK
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_listeners_forward_each_frame_once() {
        const FRAMES: u32 = 2_000;
        const INTERFACES: [&str; 3] = ["can0", "can1", "vcan0"];

        let (sink, mut downstream) = ChannelSink::new(FRAMES as usize);
        let pipeline = BridgePipeline::start(&runtime_config(1_000, 8_192), sink).unwrap();

        let listeners: Vec<_> = INTERFACES
            .iter()
            .map(|name| {
                let sender = pipeline.attach_interface(*name);
                tokio::spawn(async move {
                    for id in 0..FRAMES {
                        // Same physical frame, same arrival time on every interface.
                        sender.send(id, &id.to_be_bytes(), 0).await.unwrap();
                    }
                })
            })
            .collect();

        for listener in listeners {
            listener.await.unwrap();
        }

        let report = pipeline.shutdown().await.unwrap();
        assert_eq!(report.received, u64::from(FRAMES) * 3);
        assert_eq!(report.forwarded, u64::from(FRAMES));
        assert_eq!(report.suppressed, u64::from(FRAMES) * 2);

        let mut seen = HashSet::new();
        while let Some(frame) = downstream.recv().await {
            assert!(seen.insert(frame.id.raw()), "frame {} forwarded twice", frame.id);
        }
        assert_eq!(seen.len(), FRAMES as usize);
    }

    #[tokio::test]
    async fn test_periodic_frame_forwarded_each_period() {
        // A 100ms periodic frame bridged on two interfaces with 4ms skew.
        let (sink, mut downstream) = ChannelSink::new(64);
        let pipeline = BridgePipeline::start(&runtime_config(50, 64), sink).unwrap();
        let can0 = pipeline.attach_interface("can0");
        let can1 = pipeline.attach_interface("can1");

        for period in 0..5u64 {
            let t = period * 100;
            can0.send(0x0CF00400, &[0xF0, 0x7D, 0x7D], t).await.unwrap();
            can1.send(0x0CF00400, &[0xF0, 0x7D, 0x7D], t + 4).await.unwrap();
        }
        drop(can0);
        drop(can1);

        let report = pipeline.shutdown().await.unwrap();
        assert_eq!(report.forwarded, 5);
        assert_eq!(report.suppressed, 5);

        let mut stamps = Vec::new();
        while let Some(frame) = downstream.recv().await {
            stamps.push(frame.timestamp_ms);
        }
        assert_eq!(stamps, vec![0, 100, 200, 300, 400]);
    }

    #[tokio::test]
    async fn test_changed_payload_is_not_suppressed() {
        let sink = RecordingSink::default();
        let detector = SharedDuplicateDetector::with_clock(
            DedupConfigBuilder::new()
                .window_ms(50)
                .max_cache_size(16)
                .time_base(TimeBase::FrameArrival)
                .build()
                .unwrap(),
            ManualClock::new(0),
        )
        .unwrap();
        let (handle, adapter) = ingest::channel(detector, sink.clone(), 16);
        let can0 = handle.sender_for("can0");
        let can1 = handle.sender_for("can1");
        drop(handle);

        // A counter signal changes between copies: two logical frames.
        can0.send(0x123, &[0x01], 0).await.unwrap();
        can1.send(0x123, &[0x02], 1).await.unwrap();
        can0.send(0x123, &[0x02], 2).await.unwrap();
        drop(can0);
        drop(can1);

        let report = adapter.run().await;
        assert_eq!(report.forwarded, 2);
        assert_eq!(report.suppressed, 1);
        assert_eq!(sink.frames.lock()[1].interface.as_str(), "can1");
    }

    // =============================================================================
    // CAPACITY OVER WINDOW
    // =============================================================================

    fn capacity_scenario(policy: LedgerPolicy) {
        let config = DedupConfigBuilder::new()
            .window_ms(50)
            .max_cache_size(2)
            .ledger_policy(policy)
            .build()
            .unwrap();
        let metrics = Arc::new(Metrics::new());
        let detector = SharedDuplicateDetector::with_clock(config, ManualClock::new(0))
            .unwrap()
            .with_metrics(metrics.clone());

        assert!(!detector.is_duplicate_at(0x123, &[0x01], 0).unwrap());
        assert!(detector.is_duplicate_at(0x123, &[0x01], 10).unwrap());
        assert!(!detector.is_duplicate_at(0x456, &[0x02], 20).unwrap());
        assert!(!detector.is_duplicate_at(0x789, &[0x03], 25).unwrap());
        assert_eq!(detector.len(), 2);
        // Evicted while inside the window, so accepted again.
        assert!(!detector.is_duplicate_at(0x123, &[0x01], 30).unwrap());

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.entries_evicted, 2);
        assert_eq!(snapshot.duplicates_suppressed, 1);
        assert_eq!(snapshot.cache_size, 2);
    }

    #[test]
    fn test_capacity_scenario_recency() {
        capacity_scenario(LedgerPolicy::Recency);
    }

    #[test]
    fn test_capacity_scenario_first_insertion() {
        capacity_scenario(LedgerPolicy::FirstInsertion);
    }

    // =============================================================================
    // API SURFACE
    // =============================================================================

    #[test]
    fn test_filter_api_rejects_contract_violations() {
        let detector = SharedDuplicateDetector::with_clock(
            DedupConfigBuilder::new()
                .window_ms(50)
                .max_cache_size(8)
                .build()
                .unwrap(),
            ManualClock::new(0),
        )
        .unwrap();
        let api: &dyn DuplicateFilterApi = &detector;

        assert!(api.is_duplicate(0x100, &[0; 9]).is_err());
        assert!(api
            .is_duplicate(ArbitrationId::MAX_EXTENDED + 1, &[])
            .is_err());
        assert_eq!(api.cache_size(), 0);

        assert!(!api.is_duplicate(0x100, &[0; 8]).unwrap());
        assert!(api.is_duplicate(0x100, &[0; 8]).unwrap());
        assert_eq!(api.stats().frames_checked, 2);
    }

    // =============================================================================
    // METRICS EXPOSITION
    // =============================================================================

    #[tokio::test]
    async fn test_pipeline_decisions_are_exported() {
        let (sink, _downstream) = ChannelSink::new(16);
        let pipeline = BridgePipeline::start(&runtime_config(50, 64), sink).unwrap();
        let can0 = pipeline.attach_interface("can0");
        let can1 = pipeline.attach_interface("can1");

        can0.send(0x7E8, &[0x02, 0x41, 0x0C], 0).await.unwrap();
        can1.send(0x7E8, &[0x02, 0x41, 0x0C], 1).await.unwrap();
        drop(can0);
        drop(can1);
        pipeline.shutdown().await.unwrap();

        let text = bridge_telemetry::encode_metrics().unwrap();
        assert!(text.contains("cb_dedup_frames_checked_total"));
        assert!(text.contains("cb_dedup_duplicates_suppressed_total"));
        assert!(text.contains("cb_dedup_cache_entries"));
    }
}
