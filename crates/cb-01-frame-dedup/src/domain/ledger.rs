//! Expiry ledger
//!
//! Ordered sequence of `(signature, time)` pairs. The head is the oldest
//! entry and is what both time-based expiry and size-based eviction consume.
//!
//! Backed by an unbounded [`LruCache`] used purely as an ordered map: append,
//! peek/pop of the head and move-to-tail are all O(1), and keying by signature
//! means a signature is never present twice.

use lru::LruCache;

use super::signature::FrameSignature;

/// Insertion/recency ordered ledger of cached signatures
pub struct ExpiryLedger {
    order: LruCache<FrameSignature, u64>,
}

impl ExpiryLedger {
    pub fn new() -> Self {
        Self {
            order: LruCache::unbounded(),
        }
    }

    /// Append `(sig, time)` at the tail.
    ///
    /// If `sig` is already present its entry is replaced and moved to the
    /// tail, so the ledger never holds two entries for one signature.
    pub fn append(&mut self, sig: FrameSignature, time: u64) {
        self.order.put(sig, time);
    }

    /// Move an existing entry to the tail with a new time.
    ///
    /// Returns `false` if `sig` is not in the ledger.
    pub fn touch(&mut self, sig: &FrameSignature, time: u64) -> bool {
        match self.order.get_mut(sig) {
            Some(entry) => {
                *entry = time;
                true
            }
            None => false,
        }
    }

    /// Oldest entry, without removing it.
    pub fn peek_oldest(&self) -> Option<(FrameSignature, u64)> {
        self.order.peek_lru().map(|(sig, time)| (*sig, *time))
    }

    /// Remove and return the oldest entry.
    pub fn pop_oldest(&mut self) -> Option<(FrameSignature, u64)> {
        self.order.pop_lru()
    }

    /// Pop the head only if its time is strictly older than `cutoff`.
    pub fn pop_expired(&mut self, cutoff: u64) -> Option<(FrameSignature, u64)> {
        match self.peek_oldest() {
            Some((_, time)) if time < cutoff => self.pop_oldest(),
            _ => None,
        }
    }

    /// Ledger time recorded for `sig`, without reordering.
    pub fn time_of(&self, sig: &FrameSignature) -> Option<u64> {
        self.order.peek(sig).copied()
    }

    pub fn remove(&mut self, sig: &FrameSignature) -> Option<u64> {
        self.order.pop(sig)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    /// Entries from oldest to newest.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = (FrameSignature, u64)> + '_ {
        self.order.iter().rev().map(|(sig, time)| (*sig, *time))
    }
}

impl Default for ExpiryLedger {
    fn default() -> Self {
        Self::new()
    }
}
