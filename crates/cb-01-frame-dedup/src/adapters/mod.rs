//! Adapters Layer
//!
//! Connects bridged interface listeners to the detector and the detector to
//! the downstream pipeline.
//!
//! ## Adapters
//!
//! - `IngestAdapter` - drains the shared ingest queue through the detector
//! - `InterfaceSender` - per-interface producer handed to each listener

pub mod ingest;

pub use ingest::{channel, IngestAdapter, IngestHandle, IngestReport, InterfaceSender};
