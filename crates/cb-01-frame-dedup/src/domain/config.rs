//! Duplicate detector configuration and validation
//!
//! `window_ms` and `max_cache_size` are required: no single default is safe
//! for every bus topology. [`DedupConfig::recommended`] gives documented
//! starting values when the caller wants them explicitly.
//!
//! # Example
//!
//! ```
//! use cb_01_frame_dedup::domain::{DedupConfigBuilder, LedgerPolicy};
//! use std::time::Duration;
//!
//! let config = DedupConfigBuilder::new()
//!     .window(Duration::from_millis(30))
//!     .max_cache_size(2_048)
//!     .ledger_policy(LedgerPolicy::Recency)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.window_ms, 30);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::signature::SignatureWidth;
use crate::error::DedupError;

/// How a refresh affects a signature's ledger position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LedgerPolicy {
    /// Refresh moves the entry to the tail with the refresh time
    /// (least-recently-seen expiry and eviction).
    #[default]
    Recency,
    /// Ledger keeps first-insertion order and time; refreshes only update
    /// the last-seen time in the cache.
    FirstInsertion,
}

impl std::str::FromStr for LedgerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recency" | "lru" => Ok(LedgerPolicy::Recency),
            "first-insertion" | "insertion" | "fifo" => Ok(LedgerPolicy::FirstInsertion),
            other => Err(format!("unknown ledger policy: {}", other)),
        }
    }
}

/// Where a detector takes "now" from.
///
/// One detector reads exactly one time base, so a clock reading and a frame
/// stamp never race the same high-water mark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeBase {
    /// The detector's [`super::Clock`]. Frame stamps are ignored.
    #[default]
    Clock,
    /// Each frame's arrival stamp. Checks without a frame run at the latest
    /// arrival seen.
    FrameArrival,
}

/// Duplicate detector configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Sliding window in milliseconds within which equal signatures are one event
    pub window_ms: u64,
    /// Hard ceiling on cached signatures
    pub max_cache_size: usize,
    /// Stored signature width
    #[serde(default)]
    pub signature_width: SignatureWidth,
    /// Ledger ordering on refresh
    #[serde(default)]
    pub ledger_policy: LedgerPolicy,
    /// Source of the current time
    #[serde(default)]
    pub time_base: TimeBase,
}

impl DedupConfig {
    /// Recommended bridge window: covers single-digit to low double-digit
    /// millisecond bridging latency with margin.
    pub const RECOMMENDED_WINDOW_MS: u64 = 50;

    /// Recommended cache bound: distinct ids on a busy bus within one window.
    pub const RECOMMENDED_MAX_CACHE_SIZE: usize = 4_096;

    /// Create a validated configuration with default width and policy.
    pub fn new(window_ms: u64, max_cache_size: usize) -> Result<Self, DedupError> {
        let config = Self {
            window_ms,
            max_cache_size,
            signature_width: SignatureWidth::default(),
            ledger_policy: LedgerPolicy::default(),
            time_base: TimeBase::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Recommended starting values for a bridged vehicle bus.
    pub fn recommended() -> Self {
        Self {
            window_ms: Self::RECOMMENDED_WINDOW_MS,
            max_cache_size: Self::RECOMMENDED_MAX_CACHE_SIZE,
            signature_width: SignatureWidth::Bits64,
            ledger_policy: LedgerPolicy::Recency,
            time_base: TimeBase::Clock,
        }
    }

    /// Validate an existing configuration (e.g. one loaded via serde).
    pub fn validate(&self) -> Result<(), DedupError> {
        if self.window_ms == 0 {
            return Err(DedupError::InvalidWindow);
        }

        if self.max_cache_size == 0 {
            return Err(DedupError::InvalidCacheSize);
        }

        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn with_signature_width(mut self, width: SignatureWidth) -> Self {
        self.signature_width = width;
        self
    }

    pub fn with_ledger_policy(mut self, policy: LedgerPolicy) -> Self {
        self.ledger_policy = policy;
        self
    }

    pub fn with_time_base(mut self, time_base: TimeBase) -> Self {
        self.time_base = time_base;
        self
    }
}

/// Builder for DedupConfig with validation
#[derive(Default)]
pub struct DedupConfigBuilder {
    window_ms: Option<u64>,
    max_cache_size: Option<usize>,
    signature_width: Option<SignatureWidth>,
    ledger_policy: Option<LedgerPolicy>,
    time_base: Option<TimeBase>,
}

impl DedupConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window. Sub-millisecond parts are dropped; windows beyond
    /// `u64::MAX` milliseconds saturate.
    pub fn window(mut self, window: Duration) -> Self {
        self.window_ms = Some(u64::try_from(window.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn window_ms(mut self, ms: u64) -> Self {
        self.window_ms = Some(ms);
        self
    }

    pub fn max_cache_size(mut self, entries: usize) -> Self {
        self.max_cache_size = Some(entries);
        self
    }

    pub fn signature_width(mut self, width: SignatureWidth) -> Self {
        self.signature_width = Some(width);
        self
    }

    pub fn ledger_policy(mut self, policy: LedgerPolicy) -> Self {
        self.ledger_policy = Some(policy);
        self
    }

    pub fn time_base(mut self, time_base: TimeBase) -> Self {
        self.time_base = Some(time_base);
        self
    }

    /// Build the DedupConfig, validating all parameters
    ///
    /// Window and cache size have no fallback and must be set.
    pub fn build(self) -> Result<DedupConfig, DedupError> {
        let config = DedupConfig {
            window_ms: self.window_ms.ok_or(DedupError::MissingField("window_ms"))?,
            max_cache_size: self
                .max_cache_size
                .ok_or(DedupError::MissingField("max_cache_size"))?,
            signature_width: self.signature_width.unwrap_or_default(),
            ledger_policy: self.ledger_policy.unwrap_or_default(),
            time_base: self.time_base.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
