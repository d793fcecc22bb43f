//! # Integration Tests
//!
//! Cross-crate flows: bridged interface listeners feeding one detector and
//! a downstream sink through the runtime pipeline.

pub mod flows;
