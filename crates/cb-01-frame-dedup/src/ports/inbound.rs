//! Inbound Ports (Driving Ports)
//!
//! The API a bridge uses to ask whether a frame should be forwarded.

use bus_types::CanFrame;

use crate::error::DedupError;
use crate::service::DedupStats;

/// Primary duplicate filter API (Driving Port)
///
/// Implementations must make each call atomic with respect to every other
/// call on the same filter, and read time from a single source so that
/// `is_duplicate` and `check_frame` share one timeline.
pub trait DuplicateFilterApi: Send + Sync {
    /// Check a raw frame observed now
    ///
    /// # Returns
    /// * `Ok(true)` - suppress, an equal frame was seen within the window
    /// * `Ok(false)` - forward
    /// * `Err(_)` - the frame breaks the bus contract; the cache is untouched
    fn is_duplicate(&self, id: u32, payload: &[u8]) -> Result<bool, DedupError>;

    /// Check an already validated frame; its arrival stamp is honoured only
    /// when the filter runs on frame arrival time
    fn check_frame(&self, frame: &CanFrame) -> bool;

    /// Number of cached signatures
    fn cache_size(&self) -> usize;

    /// Lifetime counters
    fn stats(&self) -> DedupStats;

    /// Forget every cached signature
    fn reset(&self);
}
