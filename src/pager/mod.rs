//! Pagination Module
//!
//! The state machine between the rendering layer and the shard manager.
//!
//! ## Core Concepts
//! - **Current shard**: exactly one shard is held in memory at a time; page
//!   navigation only touches storage when the target page lives in a different
//!   shard than the one already loaded.
//! - **Shard loading**: the gateway is consulted first; a shard absent from the
//!   store is recomputed on demand through the background worker's locate path.
//! - **Per-group slice**: rendering reads the first rows-per-page rows of each
//!   group within the current shard, not a single globally contiguous window.

pub mod controller;
pub mod types;
