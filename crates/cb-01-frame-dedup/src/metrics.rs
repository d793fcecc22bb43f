//! Metrics hooks for duplicate suppression
//!
//! The detector reports every decision through a [`MetricsRecorder`]. The
//! in-process [`Metrics`] collector keeps atomic counters; exporters (e.g. a
//! Prometheus registry) implement the trait themselves.
//!
//! ## Usage
//!
//! ```ignore
//! use cb_01_frame_dedup::{DedupConfig, Metrics, SharedDuplicateDetector};
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(Metrics::new());
//! let detector = SharedDuplicateDetector::new(DedupConfig::recommended())
//!     .with_metrics(metrics.clone());
//!
//! detector.is_duplicate(0x123, &[1, 2])?;
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for duplicate detection
///
/// Thread-safe counters and gauges.
#[derive(Default)]
pub struct Metrics {
    /// Total frames checked
    pub frames_checked: AtomicU64,
    /// Frames suppressed as duplicates
    pub duplicates_suppressed: AtomicU64,
    /// Frames accepted and forwarded downstream
    pub frames_accepted: AtomicU64,
    /// Frames rejected for contract violations
    pub frames_rejected: AtomicU64,
    /// Entries removed by time-based expiry
    pub entries_expired: AtomicU64,
    /// Entries removed by size-based eviction
    pub entries_evicted: AtomicU64,
    /// Current cache size (gauge)
    pub cache_size: AtomicU64,
    /// Cumulative check time in nanoseconds
    pub check_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one duplicate check
    ///
    /// # Arguments
    /// * `duration` - Time spent holding the detector lock, excluding the wait
    /// * `duplicate` - Whether the frame was suppressed
    pub fn record_check(&self, duration: Duration, duplicate: bool) {
        self.frames_checked.fetch_add(1, Ordering::Relaxed);
        self.check_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if duplicate {
            self.duplicates_suppressed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.frames_accepted.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_rejected(&self) {
        self.frames_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expired(&self, count: usize) {
        self.entries_expired
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_evicted(&self, count: usize) {
        self.entries_evicted
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_cache_size(&self, size: usize) {
        self.cache_size.store(size as u64, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_checked: self.frames_checked.load(Ordering::Relaxed),
            duplicates_suppressed: self.duplicates_suppressed.load(Ordering::Relaxed),
            frames_accepted: self.frames_accepted.load(Ordering::Relaxed),
            frames_rejected: self.frames_rejected.load(Ordering::Relaxed),
            entries_expired: self.entries_expired.load(Ordering::Relaxed),
            entries_evicted: self.entries_evicted.load(Ordering::Relaxed),
            cache_size: self.cache_size.load(Ordering::Relaxed),
            avg_check_ns: self.avg_check_time_ns(),
        }
    }

    pub fn avg_check_time_ns(&self) -> u64 {
        let total = self.check_time_ns.load(Ordering::Relaxed);
        let count = self.frames_checked.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Fraction of checked frames that were suppressed.
    ///
    /// On an N-way bridge with no other traffic loss this tends to (N-1)/N.
    pub fn suppression_rate(&self) -> f64 {
        let total = self.frames_checked.load(Ordering::Relaxed);
        let suppressed = self.duplicates_suppressed.load(Ordering::Relaxed);
        if total > 0 {
            suppressed as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.frames_checked.store(0, Ordering::Relaxed);
        self.duplicates_suppressed.store(0, Ordering::Relaxed);
        self.frames_accepted.store(0, Ordering::Relaxed);
        self.frames_rejected.store(0, Ordering::Relaxed);
        self.entries_expired.store(0, Ordering::Relaxed);
        self.entries_evicted.store(0, Ordering::Relaxed);
        self.cache_size.store(0, Ordering::Relaxed);
        self.check_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_checked: u64,
    pub duplicates_suppressed: u64,
    pub frames_accepted: u64,
    pub frames_rejected: u64,
    pub entries_expired: u64,
    pub entries_evicted: u64,
    pub cache_size: u64,
    pub avg_check_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to export detector activity to Prometheus, StatsD
/// or another telemetry collector.
pub trait MetricsRecorder: Send + Sync {
    /// Record one duplicate check and its outcome
    fn record_check(&self, duration: Duration, duplicate: bool);

    /// Record a frame rejected before reaching the cache
    fn record_rejected(&self);

    /// Record entries removed by time-based expiry
    fn record_expired(&self, count: usize);

    /// Record entries removed by size-based eviction
    fn record_evicted(&self, count: usize);

    /// Record the cache size after a check
    fn record_cache_size(&self, size: usize);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_check(&self, _: Duration, _: bool) {}
    fn record_rejected(&self) {}
    fn record_expired(&self, _: usize) {}
    fn record_evicted(&self, _: usize) {}
    fn record_cache_size(&self, _: usize) {}
}

impl MetricsRecorder for Metrics {
    fn record_check(&self, duration: Duration, duplicate: bool) {
        Metrics::record_check(self, duration, duplicate);
    }

    fn record_rejected(&self) {
        Metrics::record_rejected(self);
    }

    fn record_expired(&self, count: usize) {
        Metrics::record_expired(self, count);
    }

    fn record_evicted(&self, count: usize) {
        Metrics::record_evicted(self, count);
    }

    fn record_cache_size(&self, size: usize) {
        Metrics::record_cache_size(self, size);
    }
}
