//! Duplicate Detector
//!
//! Orchestrates signature computation, ledger expiry and the
//! signature -> last-seen cache for one bus session.
//!
//! ## Per-call algorithm
//!
//! ```text
//! now ─► signature(id, payload) ─► expire stale head entries
//!                                        │
//!            ┌── in cache && now - last_seen < window ──► refresh, DUPLICATE
//!            └── otherwise ──► insert, append to ledger tail,
//!                              evict one head entry if over capacity, ACCEPT
//! ```
//!
//! ## Invariants
//!
//! - The cache and ledger always hold the same signatures (`len` equal).
//! - `len() <= max_cache_size` after every call.
//! - No cached signature has a ledger time older than `now - window`.
//!
//! This type is single-owner (`&mut self`). Share it across threads through
//! [`super::SharedDuplicateDetector`].

use bus_types::{ArbitrationId, CanFrame, FramePayload};
use std::collections::HashMap;
use tracing::{debug, info, trace};

use crate::domain::{
    compute_signature, Clock, DedupConfig, ExpiryLedger, FrameSignature, LedgerPolicy,
    MonotonicClock, TimeBase,
};
use crate::error::DedupError;

/// Outcome of a single check, with the housekeeping it triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Signature of the checked frame
    pub signature: FrameSignature,
    /// True if the frame must be suppressed
    pub duplicate: bool,
    /// Entries removed by time-based expiry during this call
    pub expired: usize,
    /// Entry removed by size-based eviction during this call
    pub evicted: Option<FrameSignature>,
}

/// Lifetime counters for one detector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DedupStats {
    pub frames_checked: u64,
    pub duplicates_suppressed: u64,
    pub frames_accepted: u64,
    pub entries_expired: u64,
    pub entries_evicted: u64,
    pub cache_size: usize,
}

/// Bounded, time-windowed, content-addressed duplicate filter.
pub struct DuplicateDetector<C: Clock = MonotonicClock> {
    config: DedupConfig,
    clock: C,
    /// signature -> last time it was seen
    cache: HashMap<FrameSignature, u64>,
    ledger: ExpiryLedger,
    /// Latest time processed; later calls never run behind it.
    high_water_ms: Option<u64>,
    stats: DedupStats,
}

impl DuplicateDetector<MonotonicClock> {
    /// Create a detector reading time from a monotonic clock.
    pub fn new(config: DedupConfig) -> Result<Self, DedupError> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> DuplicateDetector<C> {
    /// Create a detector with an explicit time source.
    pub fn with_clock(config: DedupConfig, clock: C) -> Result<Self, DedupError> {
        config.validate()?;

        info!(
            window_ms = config.window_ms,
            max_cache_size = config.max_cache_size,
            signature_bits = config.signature_width.bits(),
            ledger_policy = ?config.ledger_policy,
            time_base = ?config.time_base,
            "Duplicate detector created"
        );

        Ok(Self {
            cache: HashMap::with_capacity(config.max_cache_size.min(65_536)),
            ledger: ExpiryLedger::new(),
            config,
            clock,
            high_water_ms: None,
            stats: DedupStats::default(),
        })
    }

    /// Check a raw frame observed now.
    ///
    /// "Now" is the clock under [`TimeBase::Clock`] and the latest arrival
    /// stamp under [`TimeBase::FrameArrival`].
    ///
    /// Returns `Ok(true)` if the frame duplicates one seen within the window
    /// and must be suppressed, `Ok(false)` if it must be forwarded.
    ///
    /// # Errors
    ///
    /// Payloads over 8 bytes and identifiers over 29 bits are rejected
    /// without touching the cache.
    pub fn is_duplicate(&mut self, id: u32, payload: &[u8]) -> Result<bool, DedupError> {
        let now = self.current_time();
        self.is_duplicate_at(id, payload, now)
    }

    /// Check a raw frame at a caller-supplied time (e.g. its arrival stamp).
    pub fn is_duplicate_at(
        &mut self,
        id: u32,
        payload: &[u8],
        now_ms: u64,
    ) -> Result<bool, DedupError> {
        Ok(self.check_at(id, payload, now_ms)?.duplicate)
    }

    /// Check a validated frame.
    ///
    /// The frame's `timestamp_ms` is used only under
    /// [`TimeBase::FrameArrival`]; otherwise the clock is read.
    pub fn check_frame(&mut self, frame: &CanFrame) -> bool {
        let now = self.frame_time(frame);
        self.decide(frame.id, &frame.payload, now).duplicate
    }

    /// Check a raw frame and return the full decision.
    pub fn check_at(
        &mut self,
        id: u32,
        payload: &[u8],
        now_ms: u64,
    ) -> Result<Decision, DedupError> {
        let id = ArbitrationId::new(id)?;
        let payload = FramePayload::new(payload)?;
        Ok(self.decide(id, &payload, now_ms))
    }

    /// Check a raw frame observed now and return the decision.
    pub fn check(&mut self, id: u32, payload: &[u8]) -> Result<Decision, DedupError> {
        let now = self.current_time();
        self.check_at(id, payload, now)
    }

    /// Time of a frame under the configured time base.
    pub fn frame_time(&self, frame: &CanFrame) -> u64 {
        match self.config.time_base {
            TimeBase::Clock => self.clock.now_ms(),
            TimeBase::FrameArrival => frame.timestamp_ms,
        }
    }

    /// Current time under the configured time base.
    pub fn current_time(&self) -> u64 {
        match self.config.time_base {
            TimeBase::Clock => self.clock.now_ms(),
            TimeBase::FrameArrival => self.high_water_ms.unwrap_or(0),
        }
    }

    /// Decide for an already validated `(id, payload)`.
    pub fn decide(&mut self, id: ArbitrationId, payload: &FramePayload, now_ms: u64) -> Decision {
        let now = self.advance_time(now_ms);
        let signature = compute_signature(id, payload.as_bytes(), self.config.signature_width);
        let expired = self.expire(now);

        self.stats.frames_checked += 1;

        if let Some(last_seen) = self.cache.get_mut(&signature) {
            if now.saturating_sub(*last_seen) < self.config.window_ms {
                *last_seen = now;
                if self.config.ledger_policy == LedgerPolicy::Recency {
                    self.ledger.touch(&signature, now);
                }
                self.stats.duplicates_suppressed += 1;
                trace!(
                    arbitration_id = %id,
                    signature = %signature,
                    "Duplicate frame suppressed"
                );
                return Decision {
                    signature,
                    duplicate: true,
                    expired,
                    evicted: None,
                };
            }
        }

        // New signature, or one whose last sighting aged out of the window:
        // a new logical occurrence.
        self.cache.insert(signature, now);
        self.ledger.append(signature, now);
        let evicted = self.evict_over_capacity();

        self.stats.frames_accepted += 1;

        Decision {
            signature,
            duplicate: false,
            expired,
            evicted,
        }
    }

    /// Run time-based expiry only, e.g. from an idle timer.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self, now_ms: u64) -> usize {
        let now = self.advance_time(now_ms);
        self.expire(now)
    }

    /// Drop every cached signature and forget the time mark.
    pub fn reset(&mut self) {
        let dropped = self.cache.len();
        self.cache.clear();
        self.ledger.clear();
        self.high_water_ms = None;
        info!(dropped, "Duplicate detector reset");
    }

    pub fn contains(&self, signature: &FrameSignature) -> bool {
        self.cache.contains_key(signature)
    }

    pub fn last_seen(&self, signature: &FrameSignature) -> Option<u64> {
        self.cache.get(signature).copied()
    }

    /// Number of cached signatures.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Number of ledger entries. Always equal to [`Self::len`].
    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn stats(&self) -> DedupStats {
        DedupStats {
            cache_size: self.cache.len(),
            ..self.stats.clone()
        }
    }

    /// Ledger contents, oldest first.
    #[cfg(test)]
    pub(crate) fn ledger_entries(&self) -> Vec<(FrameSignature, u64)> {
        self.ledger.iter_oldest_first().collect()
    }

    /// Signature of `(id, payload)` under this detector's width.
    pub fn signature(&self, id: ArbitrationId, payload: &[u8]) -> FrameSignature {
        compute_signature(id, payload, self.config.signature_width)
    }

    /// Clamp `now_ms` to the latest processed time.
    ///
    /// Callers must present frames in non-decreasing time order; a late frame
    /// is treated as arriving at the high-water mark.
    fn advance_time(&mut self, now_ms: u64) -> u64 {
        let now = match self.high_water_ms {
            Some(mark) if now_ms < mark => {
                trace!(now_ms, mark, "Out-of-order timestamp clamped");
                mark
            }
            _ => now_ms,
        };
        self.high_water_ms = Some(now);
        now
    }

    /// Pop head entries older than `now - window`.
    fn expire(&mut self, now: u64) -> usize {
        let cutoff = now.saturating_sub(self.config.window_ms);
        let mut expired = 0;

        while let Some((signature, _)) = self.ledger.pop_expired(cutoff) {
            self.cache.remove(&signature);
            expired += 1;
        }

        self.stats.entries_expired += expired as u64;
        expired
    }

    /// Pop exactly one head entry if the cache is over its bound.
    fn evict_over_capacity(&mut self) -> Option<FrameSignature> {
        if self.cache.len() <= self.config.max_cache_size {
            return None;
        }

        let (signature, ledger_time) = self.ledger.pop_oldest()?;
        self.cache.remove(&signature);
        self.stats.entries_evicted += 1;

        debug!(
            signature = %signature,
            ledger_time,
            max_cache_size = self.config.max_cache_size,
            "Cache full, evicted oldest signature"
        );
        Some(signature)
    }
}
