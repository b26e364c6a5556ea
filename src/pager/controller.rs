use super::types::PageView;
use crate::sharding::types::{InputGroup, Shard, ShardedInputGroups};
use crate::store::gateway::ShardStore;
use crate::worker::executor::ShardWorker;

use anyhow::Result;
use std::sync::Arc;

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// The pagination state machine.
///
/// Owns `(current_page, rows_per_page, current_shard)` and is the only writer to
/// that state. Navigation computes the shard holding the destination page's
/// first row and reloads only when it differs from the shard already in memory.
pub struct Pager {
    current_page: usize,
    rows_per_page: usize,
    shard_size: usize,
    total_rows: usize,
    groups: Arc<Vec<InputGroup>>,
    current_shard: Option<Shard>,
    shard_loads: u64,
    worker: Arc<ShardWorker>,
    store: Arc<ShardStore>,
}

impl Pager {
    /// Builds a pager over a sharded dataset and loads shard 0 as the initial
    /// current shard, starting at page 1.
    ///
    /// `groups` is the source dataset the worker recomputes shards from when one
    /// is absent from the store.
    pub async fn initialize(
        sharded: &ShardedInputGroups,
        groups: Arc<Vec<InputGroup>>,
        worker: Arc<ShardWorker>,
        store: Arc<ShardStore>,
        rows_per_page: usize,
    ) -> Result<Self> {
        anyhow::ensure!(sharded.shard_size > 0, "shard size must be positive");

        let mut pager = Self {
            current_page: 1,
            rows_per_page,
            shard_size: sharded.shard_size,
            total_rows: sharded.total_rows,
            groups,
            current_shard: None,
            shard_loads: 0,
            worker,
            store,
        };
        pager.load_shard(0).await?;
        Ok(pager)
    }

    /// Advances one page, loading the destination shard first when the page
    /// crosses a shard boundary.
    ///
    /// The page counter advances even past the last row; callers use
    /// [`Pager::has_next_page`] to disable the control at the boundary.
    pub async fn next_page(&mut self) -> Result<()> {
        let target = ((self.current_page * self.rows_per_page) / self.shard_size) as u64;
        if self.current_shard_id() != Some(target) {
            self.load_shard(target).await?;
        }
        self.current_page += 1;
        Ok(())
    }

    /// Steps one page back; a no-op at page 1.
    pub async fn prev_page(&mut self) -> Result<()> {
        if self.current_page <= 1 {
            return Ok(());
        }
        self.current_page -= 1;

        let target = (((self.current_page - 1) * self.rows_per_page) / self.shard_size) as u64;
        if self.current_shard_id() != Some(target) {
            self.load_shard(target).await?;
        }
        Ok(())
    }

    /// Replaces the page size, resets to page 1, and reloads shard 0.
    pub async fn set_rows_per_page(&mut self, rows_per_page: usize) -> Result<()> {
        self.rows_per_page = rows_per_page;
        self.current_page = 1;
        self.load_shard(0).await
    }

    /// Render-ready snapshot: each group of the current shard truncated to the
    /// first `rows_per_page` rows (the per-group slice, not a global window).
    pub fn view(&self) -> PageView {
        let groups = self
            .current_shard
            .as_ref()
            .map(|shard| {
                shard
                    .groups
                    .iter()
                    .map(|group| InputGroup {
                        group_name: group.group_name.clone(),
                        rows: group.rows.iter().take(self.rows_per_page).cloned().collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        PageView {
            groups,
            current_page: self.current_page,
            rows_per_page: self.rows_per_page,
            total_rows: self.total_rows,
            has_next: self.has_next_page(),
            has_prev: self.has_prev_page(),
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page * self.rows_per_page < self.total_rows
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn current_shard_id(&self) -> Option<u64> {
        self.current_shard.as_ref().map(|shard| shard.shard_id)
    }

    /// How many shard loads this pager has performed (including the initial one).
    pub fn shard_load_count(&self) -> u64 {
        self.shard_loads
    }

    /// Replaces the current shard: gateway lookup first, worker recomputation
    /// when the store has no value for the id. An id beyond the dataset resolves
    /// to an empty shard, which renders as nothing.
    async fn load_shard(&mut self, shard_id: u64) -> Result<()> {
        self.shard_loads += 1;

        match self.store.get(shard_id).await? {
            Some(shard) => {
                tracing::debug!("Loaded shard {} from store", shard_id);
                self.current_shard = Some(shard);
            }
            None => {
                tracing::debug!("Shard {} absent from store, recomputing", shard_id);
                let shard = self
                    .worker
                    .get_shard(shard_id, self.shard_size, &self.groups)
                    .await?;
                self.current_shard = Some(shard);
            }
        }
        Ok(())
    }
}
