//! # Canbridge Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Criterion workloads per subsystem
//! │   └── cb_01_frame_dedup.rs
//! │
//! └── integration/      # Cross-crate flows (listeners -> detector -> sink)
//!     └── flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cb-tests
//!
//! # By category
//! cargo test -p cb-tests integration::
//!
//! # Benchmarks
//! cargo bench -p cb-tests
//! ```

pub mod benchmarks;
pub mod integration;
