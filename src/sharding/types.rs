//! Sharding Data Types
//!
//! Defines the row/group/shard records shared by the partitioner, the worker
//! protocol, the persistence gateway, and the pagination controller. Field names
//! are camelCase on the wire to match the persistence schema.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A single table row with a stable unique id.
///
/// The id is the row's identity across shards; field values are user-editable in
/// the rendering layer but never written back into shard storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InputRow {
    pub id: u64,
    pub vm_name: String,
    pub ip_address: String,
    pub subnet_mask: String,
    pub default_gateway: String,
}

/// A named group of rows. Row order inside a group is significant — it determines
/// each row's position in the flattened sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InputGroup {
    pub group_name: String,
    pub rows: Vec<InputRow>,
}

/// One contiguous window of the flattened row sequence.
///
/// Groups appear here only with the subset of their rows that fall into this
/// shard's index range; a group whose rows all landed elsewhere is omitted
/// entirely, so every group in a shard has at least one row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Shard {
    pub shard_id: u64,
    pub groups: Vec<InputGroup>,
}

impl Shard {
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|group| group.rows.len()).sum()
    }
}

/// The aggregate produced by partitioning a dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShardedInputGroups {
    pub total_rows: usize,
    pub shard_size: usize,
    pub shards: Vec<Shard>,
}

impl ShardedInputGroups {
    /// Checks the invariants a pre-sharded ingest must satisfy: a positive shard
    /// size, a row total matching the shard contents, dense zero-based shard ids,
    /// and no empty groups inside any shard.
    pub fn validate(&self) -> Result<()> {
        if self.shard_size == 0 {
            return Err(anyhow::anyhow!("shardSize must be positive"));
        }

        let actual_rows: usize = self.shards.iter().map(Shard::row_count).sum();
        if actual_rows != self.total_rows {
            return Err(anyhow::anyhow!(
                "totalRows is {} but shards contain {} rows",
                self.total_rows,
                actual_rows
            ));
        }

        for (index, shard) in self.shards.iter().enumerate() {
            if shard.shard_id != index as u64 {
                return Err(anyhow::anyhow!(
                    "shard ids must be dense and zero-based: expected {} at position {}, found {}",
                    index,
                    index,
                    shard.shard_id
                ));
            }
            if shard.groups.iter().any(|group| group.rows.is_empty()) {
                return Err(anyhow::anyhow!(
                    "shard {} contains a group with no rows",
                    shard.shard_id
                ));
            }
        }

        Ok(())
    }

    /// Reconstructs the source group list from the shard sequence.
    ///
    /// A group split across a shard boundary appears at the tail of one shard and
    /// the head of the next; those two fragments are merged back together when
    /// their names match. Adjacent distinct source groups sharing a name cannot be
    /// told apart from a split and merge as well.
    pub fn source_groups(&self) -> Vec<InputGroup> {
        let mut groups: Vec<InputGroup> = Vec::new();

        for shard in &self.shards {
            for (index, group) in shard.groups.iter().enumerate() {
                if index == 0
                    && let Some(last) = groups.last_mut()
                    && last.group_name == group.group_name
                {
                    last.rows.extend(group.rows.iter().cloned());
                    continue;
                }
                groups.push(group.clone());
            }
        }

        groups
    }
}
