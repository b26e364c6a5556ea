//! Sharding Module
//!
//! Implements the partitioning core: grouped rows are flattened into a single
//! ordered sequence and sliced into contiguous, fixed-capacity shards.
//!
//! ## Core Concepts
//! - **Flattened row sequence**: the concatenation of all groups' rows in source
//!   order, used as the single ordering basis for sharding.
//! - **Shard**: a contiguous window of that sequence, retaining per-group
//!   structure. Shard ids are dense and zero-based.
//! - **Locate**: any single shard can be recomputed on demand from the source
//!   groups, with output identical to the full partition at that index.

pub mod partitioner;
pub mod types;

#[cfg(test)]
mod tests;
