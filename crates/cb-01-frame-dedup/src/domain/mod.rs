//! Domain Layer - Pure deduplication logic
//!
//! This layer contains:
//! - Signature function (content identity of a frame)
//! - Expiry ledger (ordered signature/time sequence)
//! - Detector configuration
//! - Clock port and implementations
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - No locking; concurrency lives in the service layer

pub mod clock;
pub mod config;
pub mod ledger;
pub mod signature;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{DedupConfig, DedupConfigBuilder, LedgerPolicy, TimeBase};
pub use ledger::ExpiryLedger;
pub use signature::{compute_signature, signature_of, FrameSignature, SignatureWidth};
