//! # Canbridge Benchmarks
//!
//! Criterion workloads per subsystem, driven from `benches/`.

pub mod cb_01_frame_dedup;
