//! # CB-01 Frame Deduplication
//!
//! Duplicate suppression for frames on a bridged bus. When two or more
//! physical interfaces carry the same logical traffic, every frame arrives
//! once per interface; this crate forwards the first copy and suppresses the
//! rest for a short time window.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O, no locking
//!   - `compute_signature`: content identity of `(id, payload)`
//!   - `ExpiryLedger`: ordered `(signature, time)` sequence
//!   - `DedupConfig` / `DedupConfigBuilder`: validated configuration
//!   - `Clock`: time source port with monotonic and manual implementations
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `DuplicateDetector`: per-frame decision, expiry and eviction
//!   - `SharedDuplicateDetector`: one lock around the whole check-then-update
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `DuplicateFilterApi`: Driving port
//!   - `FrameSink`, `Clock`, `MetricsRecorder`: Driven ports
//!
//! - **Adapters Layer** (`adapters/`): Interface listeners to downstream sink
//!
//! ## Invariants
//!
//! - Cache and ledger hold the same signatures.
//! - The cache never holds more than `max_cache_size` signatures after a call.
//! - A frame equal in `(id, payload)` to one seen less than `window_ms` ago
//!   is suppressed, unless capacity eviction already removed it.
//!
//! ## Usage Example
//!
//! ```
//! use cb_01_frame_dedup::{DedupConfig, DuplicateDetector};
//!
//! let config = DedupConfig::new(50, 4_096).unwrap();
//! let mut detector = DuplicateDetector::new(config).unwrap();
//!
//! // Same frame from can0 and, 3ms later, from can1.
//! assert!(!detector.is_duplicate_at(0x18FEF100, &[0x01, 0x02], 1_000).unwrap());
//! assert!(detector.is_duplicate_at(0x18FEF100, &[0x01, 0x02], 1_003).unwrap());
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    compute_signature, signature_of, Clock, DedupConfig, DedupConfigBuilder, ExpiryLedger,
    FrameSignature, LedgerPolicy, ManualClock, MonotonicClock, SignatureWidth, TimeBase,
};
pub use error::{DedupError, IngestError, SinkError};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{DuplicateFilterApi, FrameSink};
pub use service::{Decision, DedupStats, DuplicateDetector, SharedDuplicateDetector};

pub use adapters::{IngestAdapter, IngestHandle, IngestReport, InterfaceSender};
