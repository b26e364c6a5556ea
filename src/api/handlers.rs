use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::protocol::{IngestRequest, IngestResponse, RowsPerPageRequest};
use crate::pager::controller::{DEFAULT_ROWS_PER_PAGE, Pager};
use crate::pager::types::PageView;
use crate::sharding::types::{Shard, ShardedInputGroups};
use crate::store::gateway::ShardStore;
use crate::worker::executor::ShardWorker;

/// Shared state behind the HTTP surface.
///
/// The pager is created on ingest and replaced wholesale on re-ingest; the
/// mutex makes it the single writer to the pagination state.
pub struct AppContext {
    pub worker: Arc<ShardWorker>,
    pub store: Arc<ShardStore>,
    pub pager: Mutex<Option<Pager>>,
}

impl AppContext {
    pub fn new(worker: Arc<ShardWorker>, store: Arc<ShardStore>) -> Arc<Self> {
        Arc::new(Self {
            worker,
            store,
            pager: Mutex::new(None),
        })
    }
}

pub async fn handle_ingest(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, (StatusCode, String)> {
    let (sharded, source_groups) = match request {
        IngestRequest::Sharded(sharded) => {
            sharded
                .validate()
                .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
            let groups = sharded.source_groups();
            (sharded, groups)
        }
        IngestRequest::Unsharded(input) => {
            if input.shard_size == 0 {
                return Err((
                    StatusCode::BAD_REQUEST,
                    "shardSize must be positive".to_string(),
                ));
            }
            let actual_rows: usize = input.groups.iter().map(|group| group.rows.len()).sum();
            if input.total_rows != actual_rows {
                return Err((
                    StatusCode::BAD_REQUEST,
                    format!(
                        "totalRows is {} but groups contain {} rows",
                        input.total_rows, actual_rows
                    ),
                ));
            }

            let shards = ctx
                .worker
                .shard_data(&input.groups, input.shard_size)
                .await
                .map_err(|e| {
                    tracing::error!("Partitioning failed: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                })?;

            (
                ShardedInputGroups {
                    total_rows: actual_rows,
                    shard_size: input.shard_size,
                    shards,
                },
                input.groups,
            )
        }
    };

    ctx.store.upsert_all(&sharded.shards).await.map_err(|e| {
        tracing::error!("Failed to persist shards: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let pager = Pager::initialize(
        &sharded,
        Arc::new(source_groups),
        ctx.worker.clone(),
        ctx.store.clone(),
        DEFAULT_ROWS_PER_PAGE,
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to initialize pager: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    *ctx.pager.lock().await = Some(pager);

    tracing::info!(
        "Ingested {} rows into {} shards of size {}",
        sharded.total_rows,
        sharded.shards.len(),
        sharded.shard_size
    );

    Ok(Json(IngestResponse {
        total_rows: sharded.total_rows,
        shard_size: sharded.shard_size,
        shard_count: sharded.shards.len(),
    }))
}

pub async fn handle_page(
    Extension(ctx): Extension<Arc<AppContext>>,
) -> Result<Json<PageView>, (StatusCode, String)> {
    let pager = ctx.pager.lock().await;
    match pager.as_ref() {
        Some(pager) => Ok(Json(pager.view())),
        None => Err((StatusCode::NOT_FOUND, "No dataset ingested".to_string())),
    }
}

pub async fn handle_next_page(
    Extension(ctx): Extension<Arc<AppContext>>,
) -> Result<Json<PageView>, (StatusCode, String)> {
    let mut pager = ctx.pager.lock().await;
    match pager.as_mut() {
        Some(pager) => {
            pager.next_page().await.map_err(|e| {
                tracing::error!("Failed to advance page: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            })?;
            Ok(Json(pager.view()))
        }
        None => Err((StatusCode::NOT_FOUND, "No dataset ingested".to_string())),
    }
}

pub async fn handle_prev_page(
    Extension(ctx): Extension<Arc<AppContext>>,
) -> Result<Json<PageView>, (StatusCode, String)> {
    let mut pager = ctx.pager.lock().await;
    match pager.as_mut() {
        Some(pager) => {
            pager.prev_page().await.map_err(|e| {
                tracing::error!("Failed to step back a page: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            })?;
            Ok(Json(pager.view()))
        }
        None => Err((StatusCode::NOT_FOUND, "No dataset ingested".to_string())),
    }
}

pub async fn handle_set_rows_per_page(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(request): Json<RowsPerPageRequest>,
) -> Result<Json<PageView>, (StatusCode, String)> {
    let mut pager = ctx.pager.lock().await;
    match pager.as_mut() {
        Some(pager) => {
            pager
                .set_rows_per_page(request.rows_per_page)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to change rows per page: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                })?;
            Ok(Json(pager.view()))
        }
        None => Err((StatusCode::NOT_FOUND, "No dataset ingested".to_string())),
    }
}

pub async fn handle_get_shard(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(shard_id): Path<u64>,
) -> Result<Json<Shard>, (StatusCode, String)> {
    match ctx.store.get(shard_id).await {
        Ok(Some(shard)) => Ok(Json(shard)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            format!("Shard {} not found", shard_id),
        )),
        Err(e) => {
            tracing::error!("Shard lookup failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
