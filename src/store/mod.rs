//! Persistence Module
//!
//! The gateway to the local embedded key-value store holding persisted shards.
//!
//! ## Core Concepts
//! - **One collection**: a single `input-shards` column family, primary key =
//!   shard id (big-endian `u64` bytes), value = the encoded shard.
//! - **Idempotent upsert**: writing a shard id twice keeps the newer value.
//! - **Absent is not an error**: looking up a missing shard id yields `None`.
//! - **One handle**: the database connection is opened once per process and
//!   shared; concurrent callers await the same initialization.

pub mod gateway;
