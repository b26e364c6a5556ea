use crate::sharding::types::Shard;

use anyhow::Result;
use lru::LruCache;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

const CF_INPUT_SHARDS: &str = "input-shards";
/// Upper bound on shards kept in the read cache; the point of sharding is to
/// keep the full dataset out of active memory.
const READ_CACHE_SHARDS: usize = 16;

static SHARED_STORE: OnceCell<Arc<ShardStore>> = OnceCell::const_new();

/// Asynchronous gateway over the shard collection.
///
/// RocksDB calls run on the blocking pool; a small LRU cache fronts reads and is
/// written through on upsert.
pub struct ShardStore {
    db: Arc<DB>,
    cache: Mutex<LruCache<u64, Shard>>,
}

impl ShardStore {
    /// Opens (creating if missing) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut options = Options::default();
        options.create_if_missing(true);
        options.create_missing_column_families(true);

        let cfs = vec![ColumnFamilyDescriptor::new(
            CF_INPUT_SHARDS,
            Options::default(),
        )];
        let db = DB::open_cf_descriptors(&options, path, cfs)?;

        Ok(Self {
            db: Arc::new(db),
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(READ_CACHE_SHARDS).unwrap_or(NonZeroUsize::MIN),
            )),
        })
    }

    /// Returns the process-wide shared store, opening it on first use.
    ///
    /// The connection is acquired exactly once for the process lifetime;
    /// concurrent callers await the same initialization rather than racing to
    /// open a second handle. The path of the first call wins.
    pub async fn shared(path: impl AsRef<Path>) -> Result<Arc<ShardStore>> {
        let path = path.as_ref().to_path_buf();
        let store = SHARED_STORE
            .get_or_try_init(|| async move {
                let store =
                    tokio::task::spawn_blocking(move || ShardStore::open(path)).await??;
                Ok::<_, anyhow::Error>(Arc::new(store))
            })
            .await?;
        Ok(store.clone())
    }

    /// Writes a shard under its id, overwriting any existing value.
    pub async fn upsert(&self, shard: &Shard) -> Result<()> {
        let key = shard.shard_id.to_be_bytes();
        let value = bincode::serialize(shard)?;

        let db = self.db.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let cf = db
                .cf_handle(CF_INPUT_SHARDS)
                .ok_or_else(|| anyhow::anyhow!("missing {} column family", CF_INPUT_SHARDS))?;
            db.put_cf(cf, key, value)?;
            Ok(())
        })
        .await??;

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(shard.shard_id, shard.clone());
        }

        tracing::debug!("Upserted shard {}", shard.shard_id);
        Ok(())
    }

    /// Writes a batch of shards one by one, in order.
    pub async fn upsert_all(&self, shards: &[Shard]) -> Result<()> {
        for shard in shards {
            self.upsert(shard).await?;
        }
        Ok(())
    }

    /// Looks up a shard by id. A missing key is `None`, never an error.
    pub async fn get(&self, shard_id: u64) -> Result<Option<Shard>> {
        if let Ok(mut cache) = self.cache.lock()
            && let Some(shard) = cache.get(&shard_id)
        {
            return Ok(Some(shard.clone()));
        }

        let db = self.db.clone();
        let bytes = tokio::task::spawn_blocking(move || -> Result<Option<Vec<u8>>> {
            let cf = db
                .cf_handle(CF_INPUT_SHARDS)
                .ok_or_else(|| anyhow::anyhow!("missing {} column family", CF_INPUT_SHARDS))?;
            Ok(db.get_cf(cf, shard_id.to_be_bytes())?)
        })
        .await??;

        match bytes {
            Some(bytes) => {
                let shard: Shard = bincode::deserialize(&bytes)?;
                if let Ok(mut cache) = self.cache.lock() {
                    cache.put(shard_id, shard.clone());
                }
                Ok(Some(shard))
            }
            None => Ok(None),
        }
    }

    /// Number of shards currently persisted.
    pub async fn shard_count(&self) -> Result<usize> {
        let db = self.db.clone();
        let count = tokio::task::spawn_blocking(move || -> Result<usize> {
            let cf = db
                .cf_handle(CF_INPUT_SHARDS)
                .ok_or_else(|| anyhow::anyhow!("missing {} column family", CF_INPUT_SHARDS))?;
            let mut count = 0usize;
            for entry in db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
                entry?;
                count += 1;
            }
            Ok(count)
        })
        .await??;
        Ok(count)
    }
}
