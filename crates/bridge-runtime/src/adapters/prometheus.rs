//! Prometheus-backed metrics recorder.

use bridge_telemetry::{
    DEDUP_CACHE_SIZE, DEDUP_CHECK_DURATION, DEDUP_DUPLICATES_SUPPRESSED, DEDUP_ENTRIES_EVICTED,
    DEDUP_ENTRIES_EXPIRED, DEDUP_FRAMES_ACCEPTED, DEDUP_FRAMES_CHECKED, INGEST_FRAMES_REJECTED,
};
use cb_01_frame_dedup::MetricsRecorder;
use std::time::Duration;

/// Reports detector decisions to the global Prometheus registry.
///
/// Call [`bridge_telemetry::register_metrics`] once so the series are
/// exported; recording works either way.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrometheusRecorder;

impl PrometheusRecorder {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsRecorder for PrometheusRecorder {
    fn record_check(&self, duration: Duration, duplicate: bool) {
        DEDUP_FRAMES_CHECKED.inc();
        DEDUP_CHECK_DURATION.observe(duration.as_secs_f64());
        if duplicate {
            DEDUP_DUPLICATES_SUPPRESSED.inc();
        } else {
            DEDUP_FRAMES_ACCEPTED.inc();
        }
    }

    fn record_rejected(&self) {
        INGEST_FRAMES_REJECTED.inc();
    }

    fn record_expired(&self, count: usize) {
        DEDUP_ENTRIES_EXPIRED.inc_by(count as u64);
    }

    fn record_evicted(&self, count: usize) {
        DEDUP_ENTRIES_EVICTED.inc_by(count as u64);
    }

    fn record_cache_size(&self, size: usize) {
        DEDUP_CACHE_SIZE.set(size as i64);
    }
}
