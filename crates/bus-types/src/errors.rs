//! # Error Types
//!
//! Frame validation errors. Both are caller contract violations.

use thiserror::Error;

/// Errors raised while building a frame from raw listener data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Identifier does not fit in the 29-bit extended format.
    #[error("Invalid arbitration id: {id:#x} exceeds 29 bits")]
    InvalidArbitrationId { id: u32 },

    /// Payload longer than the bus maximum frame size.
    #[error("Payload too long: {len} bytes > {max}")]
    PayloadTooLong { len: usize, max: usize },
}
