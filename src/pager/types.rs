//! Pagination Data Types
//!
//! The render-ready state handed to the rendering layer.

use crate::sharding::types::InputGroup;
use serde::{Deserialize, Serialize};

/// Snapshot of the pager for one render pass.
///
/// `groups` holds the current shard's groups, each truncated to the first
/// `rows_per_page` rows. `has_next`/`has_prev` exist so the rendering layer can
/// disable its controls; the pager itself does not hard-stop at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub groups: Vec<InputGroup>,
    pub current_page: usize,
    pub rows_per_page: usize,
    pub total_rows: usize,
    pub has_next: bool,
    pub has_prev: bool,
}
