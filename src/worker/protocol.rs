//! Worker Message Protocol
//!
//! Defines the action names and Data Transfer Objects exchanged with the
//! background worker. Every request is self-contained — the groups collection and
//! shard size travel inside the payload — so the worker holds no state of its own.

use crate::sharding::types::{InputGroup, Shard};
use serde::{Deserialize, Serialize};

// --- Actions ---

/// Partition the full dataset into the complete shard list.
pub const ACTION_SHARD_DATA: &str = "shardData";
/// Recompute a single shard by id.
pub const ACTION_GET_SHARD: &str = "getShard";

// --- Data Transfer Objects ---

/// A request envelope submitted to the worker.
///
/// The `request_id` is a fresh UUID assigned at submission time; replies echo it
/// back so the caller can match responses to requests explicitly instead of
/// relying on response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardJob {
    pub request_id: String,
    pub action: String,
    pub payload: serde_json::Value,
}

/// The reply envelope emitted by the worker for exactly one `ShardJob`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardJobReply {
    pub request_id: String,
    pub outcome: ShardOutcome,
}

/// The result of a worker action: a full shard list, a single shard, or a typed
/// error. Serialized untagged so the wire shape is the array / object / error
/// object the rendering layer expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ShardOutcome {
    ShardList(Vec<Shard>),
    Shard(Shard),
    Error { error: String },
}

/// Payload for `shardData`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardDataPayload {
    pub groups: Vec<InputGroup>,
    pub shard_size: usize,
}

/// Payload for `getShard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetShardPayload {
    pub shard_id: u64,
    pub shard_size: usize,
    pub groups: Vec<InputGroup>,
}
