//! Error types for the frame deduplication subsystem
//!
//! There are no retryable errors here: the detector performs no I/O. Every
//! variant is a configuration or caller contract violation.

use bus_types::FrameError;
use thiserror::Error;

/// Errors raised by the duplicate detector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DedupError {
    #[error("Invalid window: window_ms must be > 0")]
    InvalidWindow,

    #[error("Invalid cache size: max_cache_size must be > 0")]
    InvalidCacheSize,

    #[error("Missing required configuration field: {0}")]
    MissingField(&'static str),

    #[error("Invalid signature width: {0} bits (expected 32, 64 or 128)")]
    InvalidSignatureWidth(u32),

    #[error("Rejected frame: {0}")]
    Frame(#[from] FrameError),
}

/// Errors from the downstream frame sink
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("Downstream sink closed")]
    Closed,

    #[error("Downstream sink rejected frame: {0}")]
    Rejected(String),
}

/// Errors from an interface sender feeding the ingest queue
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Invalid frame: {0}")]
    InvalidFrame(#[from] FrameError),

    #[error("Ingest queue closed")]
    QueueClosed,
}
