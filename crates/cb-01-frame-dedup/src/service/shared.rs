//! Thread-safe detector handle
//!
//! Bridged interfaces are usually read by separate listener threads. The
//! whole check-then-update sequence must run under one critical section,
//! otherwise two copies of the same frame can both observe "absent" and both
//! be forwarded. One mutex guards cache and ledger together; hold time is
//! bounded by the number of entries expired in the call.

use bus_types::CanFrame;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::detector::{Decision, DedupStats, DuplicateDetector};
use crate::domain::{Clock, DedupConfig, FrameSignature, MonotonicClock};
use crate::error::DedupError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::DuplicateFilterApi;

/// Lock hold time and the outcome of one check.
type Timed = (Duration, Result<(Decision, usize), DedupError>);

/// Cloneable, `Send + Sync` handle to one duplicate detector.
pub struct SharedDuplicateDetector<C: Clock = MonotonicClock> {
    inner: Arc<Mutex<DuplicateDetector<C>>>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<C: Clock> Clone for SharedDuplicateDetector<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl SharedDuplicateDetector<MonotonicClock> {
    pub fn new(config: DedupConfig) -> Result<Self, DedupError> {
        Ok(Self::from_detector(DuplicateDetector::new(config)?))
    }
}

impl<C: Clock> SharedDuplicateDetector<C> {
    pub fn with_clock(config: DedupConfig, clock: C) -> Result<Self, DedupError> {
        Ok(Self::from_detector(DuplicateDetector::with_clock(
            config, clock,
        )?))
    }

    /// Wrap an existing detector.
    pub fn from_detector(detector: DuplicateDetector<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(detector)),
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Report decisions to `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Check a raw frame observed now (see [`DuplicateDetector::is_duplicate`]).
    pub fn is_duplicate(&self, id: u32, payload: &[u8]) -> Result<bool, DedupError> {
        let timed = self.timed(|detector| detector.check(id, payload));
        self.observe(timed).map(|d| d.duplicate)
    }

    /// Check a raw frame at a caller-supplied time.
    pub fn is_duplicate_at(&self, id: u32, payload: &[u8], now_ms: u64) -> Result<bool, DedupError> {
        let timed = self.timed(|detector| detector.check_at(id, payload, now_ms));
        self.observe(timed).map(|d| d.duplicate)
    }

    /// Check a validated frame under the configured time base.
    pub fn check_frame(&self, frame: &CanFrame) -> bool {
        let timed = self.timed(|detector| {
            let now = detector.frame_time(frame);
            Ok(detector.decide(frame.id, &frame.payload, now))
        });
        self.observe(timed)
            .map(|d| d.duplicate)
            .unwrap_or(false)
    }

    /// Run time-based expiry without checking a frame.
    pub fn sweep(&self, now_ms: u64) -> usize {
        let (expired, size) = {
            let mut detector = self.inner.lock();
            let expired = detector.sweep(now_ms);
            (expired, detector.len())
        };
        self.metrics.record_expired(expired);
        self.metrics.record_cache_size(size);
        expired
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
        self.metrics.record_cache_size(0);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn contains(&self, signature: &FrameSignature) -> bool {
        self.inner.lock().contains(signature)
    }

    pub fn stats(&self) -> DedupStats {
        self.inner.lock().stats()
    }

    pub fn config(&self) -> DedupConfig {
        self.inner.lock().config().clone()
    }

    /// Recorder receiving this detector's decisions.
    pub fn metrics(&self) -> Arc<dyn MetricsRecorder> {
        Arc::clone(&self.metrics)
    }

    /// Run `f` with exclusive access to the detector.
    pub fn with_detector<R>(&self, f: impl FnOnce(&mut DuplicateDetector<C>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Run one check under the lock, timing only the locked section.
    fn timed(
        &self,
        check: impl FnOnce(&mut DuplicateDetector<C>) -> Result<Decision, DedupError>,
    ) -> Timed {
        let mut detector = self.inner.lock();
        let start = Instant::now();
        let result = check(&mut *detector).map(|d| (d, detector.len()));
        (start.elapsed(), result)
    }

    /// Report a decision outside the lock.
    fn observe(&self, (elapsed, result): Timed) -> Result<Decision, DedupError> {
        match result {
            Ok((decision, size)) => {
                self.metrics.record_check(elapsed, decision.duplicate);
                if decision.expired > 0 {
                    self.metrics.record_expired(decision.expired);
                }
                if decision.evicted.is_some() {
                    self.metrics.record_evicted(1);
                }
                self.metrics.record_cache_size(size);
                Ok(decision)
            }
            Err(e) => {
                self.metrics.record_rejected();
                Err(e)
            }
        }
    }
}

impl<C: Clock + 'static> DuplicateFilterApi for SharedDuplicateDetector<C> {
    fn is_duplicate(&self, id: u32, payload: &[u8]) -> Result<bool, DedupError> {
        SharedDuplicateDetector::is_duplicate(self, id, payload)
    }

    fn check_frame(&self, frame: &CanFrame) -> bool {
        SharedDuplicateDetector::check_frame(self, frame)
    }

    fn cache_size(&self) -> usize {
        self.len()
    }

    fn stats(&self) -> DedupStats {
        SharedDuplicateDetector::stats(self)
    }

    fn reset(&self) {
        SharedDuplicateDetector::reset(self)
    }
}
