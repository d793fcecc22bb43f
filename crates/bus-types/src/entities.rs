//! # Frame Entities
//!
//! - [`ArbitrationId`]: 11-bit standard or 29-bit extended identifier
//! - [`FramePayload`]: 0–8 data bytes stored inline
//! - [`InterfaceId`]: logical ingress interface (`can0`, `vcan1`, ...)
//! - [`CanFrame`]: one observation of a frame on one interface

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::FrameError;

/// Maximum payload length of a classic bus frame.
pub const MAX_PAYLOAD_LEN: usize = 8;

/// Arbitration identifier of a bus frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ArbitrationId(u32);

impl ArbitrationId {
    /// Highest 11-bit standard identifier.
    pub const MAX_STANDARD: u32 = 0x7FF;
    /// Highest 29-bit extended identifier.
    pub const MAX_EXTENDED: u32 = 0x1FFF_FFFF;

    /// Validate a raw identifier.
    pub fn new(raw: u32) -> Result<Self, FrameError> {
        if raw > Self::MAX_EXTENDED {
            return Err(FrameError::InvalidArbitrationId { id: raw });
        }
        Ok(Self(raw))
    }

    /// Raw numeric value.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// True when the identifier needs the 29-bit format.
    pub fn is_extended(self) -> bool {
        self.0 > Self::MAX_STANDARD
    }
}

impl TryFrom<u32> for ArbitrationId {
    type Error = FrameError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ArbitrationId> for u32 {
    fn from(id: ArbitrationId) -> Self {
        id.0
    }
}

impl fmt::Display for ArbitrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_extended() {
            write!(f, "{:#010x}", self.0)
        } else {
            write!(f, "{:#05x}", self.0)
        }
    }
}

/// Frame data bytes, at most [`MAX_PAYLOAD_LEN`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct FramePayload {
    data: [u8; MAX_PAYLOAD_LEN],
    len: u8,
}

impl FramePayload {
    /// Copy `bytes` into a payload. Fails on more than 8 bytes.
    pub fn new(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLong {
                len: bytes.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        let mut data = [0u8; MAX_PAYLOAD_LEN];
        data[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            data,
            len: bytes.len() as u8,
        })
    }

    /// Exactly the received bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for FramePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_bytes()).finish()
    }
}

impl TryFrom<Vec<u8>> for FramePayload {
    type Error = FrameError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(&bytes)
    }
}

impl From<FramePayload> for Vec<u8> {
    fn from(payload: FramePayload) -> Self {
        payload.as_bytes().to_vec()
    }
}

/// Logical interface a frame was observed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceId(pub String);

impl InterfaceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InterfaceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// One observation of a bus frame.
///
/// The same physical frame bridged across N interfaces arrives as N
/// `CanFrame`s with equal `id`/`payload` and different `interface` and
/// `timestamp_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanFrame {
    /// Arbitration identifier.
    pub id: ArbitrationId,
    /// Data bytes.
    pub payload: FramePayload,
    /// Monotonic arrival time in milliseconds.
    pub timestamp_ms: u64,
    /// Interface that delivered this copy.
    pub interface: InterfaceId,
}

impl CanFrame {
    /// Build a frame from raw listener data, validating id and payload.
    pub fn new(
        raw_id: u32,
        payload: &[u8],
        timestamp_ms: u64,
        interface: impl Into<InterfaceId>,
    ) -> Result<Self, FrameError> {
        Ok(Self {
            id: ArbitrationId::new(raw_id)?,
            payload: FramePayload::new(payload)?,
            timestamp_ms,
            interface: interface.into(),
        })
    }

    /// True when both frames carry the same content, ignoring provenance.
    pub fn same_content(&self, other: &CanFrame) -> bool {
        self.id == other.id && self.payload == other.payload
    }
}
