//! # Bus Types Crate
//!
//! Frame entities shared by every crate that touches bus traffic.
//!
//! ## Design Principles
//!
//! - **Validated at the edge**: a [`CanFrame`] can only be built from an
//!   identifier that fits in 29 bits and a payload of at most 8 bytes.
//!   Oversized payloads are rejected, never truncated.
//! - **Content vs. provenance**: identifier and payload are the frame's
//!   content; arrival time and ingress interface are provenance and are kept
//!   separate so consumers can ignore them when deriving identity.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
