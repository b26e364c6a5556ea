//! HTTP API Protocol
//!
//! Endpoint paths and Data Transfer Objects for the ingest and pagination
//! surface consumed by the rendering layer.

use crate::sharding::types::{InputGroup, ShardedInputGroups};
use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Ingest a dataset (pre-partition or pre-sharded).
pub const ENDPOINT_INGEST: &str = "/ingest";
/// Current render-ready page state.
pub const ENDPOINT_PAGE: &str = "/page";
/// Advance one page.
pub const ENDPOINT_PAGE_NEXT: &str = "/page/next";
/// Step one page back.
pub const ENDPOINT_PAGE_PREV: &str = "/page/prev";
/// Replace the rows-per-page window.
pub const ENDPOINT_PAGE_ROWS: &str = "/page/rows";
/// Direct shard lookup by id.
pub const ENDPOINT_SHARD: &str = "/shard/:shard_id";

// --- Data Transfer Objects ---

/// Ingest body: either a full pre-sharded aggregate (accepted as-is after
/// validation) or the pre-partition form the core shards itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngestRequest {
    Sharded(ShardedInputGroups),
    Unsharded(UnshardedInput),
}

/// Pre-partition ingest form. `total_rows` must match the rows in `groups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnshardedInput {
    pub total_rows: usize,
    pub shard_size: usize,
    pub groups: Vec<InputGroup>,
}

/// Acknowledgment for a completed ingest.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub total_rows: usize,
    pub shard_size: usize,
    pub shard_count: usize,
}

/// Body for the rows-per-page endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsPerPageRequest {
    pub rows_per_page: usize,
}
