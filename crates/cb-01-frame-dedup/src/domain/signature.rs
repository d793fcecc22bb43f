//! Frame signature function
//!
//! A signature is the content identity of a frame: SipHash-1-3 (128-bit) over
//! the arbitration id (4 bytes, big-endian) followed by the payload bytes.
//! Arrival time and ingress interface never take part, so every bridged copy
//! of one physical frame maps to the same signature.
//!
//! The hash keys are fixed, which keeps signatures stable across runs. This is
//! an identity function, not a security primitive: collisions are possible and
//! become likelier as [`SignatureWidth`] narrows.

use bus_types::{ArbitrationId, CanFrame};
use serde::{Deserialize, Serialize};
use siphasher::sip128::{Hasher128, SipHasher13};
use std::fmt;
use std::hash::Hasher;

/// Stored width of a frame signature.
///
/// Narrower widths raise the chance that two distinct frames share a
/// signature, which shows up as false duplicate suppression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureWidth {
    Bits32,
    #[default]
    Bits64,
    Bits128,
}

impl SignatureWidth {
    /// Width in bits.
    pub fn bits(self) -> u32 {
        match self {
            SignatureWidth::Bits32 => 32,
            SignatureWidth::Bits64 => 64,
            SignatureWidth::Bits128 => 128,
        }
    }

    /// Parse a width given in bits.
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(SignatureWidth::Bits32),
            64 => Some(SignatureWidth::Bits64),
            128 => Some(SignatureWidth::Bits128),
            _ => None,
        }
    }

    fn mask(self) -> u128 {
        match self {
            SignatureWidth::Bits32 => u32::MAX as u128,
            SignatureWidth::Bits64 => u64::MAX as u128,
            SignatureWidth::Bits128 => u128::MAX,
        }
    }
}

/// Fixed-width content identity of a frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSignature {
    value: u128,
    width: SignatureWidth,
}

impl FrameSignature {
    /// Truncated digest value.
    pub fn value(&self) -> u128 {
        self.value
    }

    pub fn width(&self) -> SignatureWidth {
        self.width
    }

    /// Big-endian bytes of the truncated digest, `width / 8` long.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = (self.width.bits() / 8) as usize;
        self.value.to_be_bytes()[16 - len..].to_vec()
    }
}

impl fmt::Display for FrameSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for FrameSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameSignature({})", self)
    }
}

/// Compute the signature of `(id, payload)` at the given width.
pub fn compute_signature(id: ArbitrationId, payload: &[u8], width: SignatureWidth) -> FrameSignature {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write(&id.raw().to_be_bytes());
    hasher.write(payload);
    let digest = hasher.finish128().as_u128();

    FrameSignature {
        value: digest & width.mask(),
        width,
    }
}

/// Signature of a frame's content.
pub fn signature_of(frame: &CanFrame, width: SignatureWidth) -> FrameSignature {
    compute_signature(frame.id, frame.payload.as_bytes(), width)
}
