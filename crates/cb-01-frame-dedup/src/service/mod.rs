//! Service Layer
//!
//! Orchestrates the domain (signature, ledger, clock) into the
//! per-frame duplicate decision, and wraps it for shared use.

pub mod detector;
pub mod shared;

pub use detector::{Decision, DedupStats, DuplicateDetector};
pub use shared::SharedDuplicateDetector;
