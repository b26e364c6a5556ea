//! Worker Execution Engine
//!
//! Spawns the background task that services shard jobs and the dispatcher that
//! routes replies back to their waiting callers by correlation id.
//!
//! ## Responsibilities
//! - **Dispatch**: matching the action name to the partitioning function; unknown
//!   actions yield a typed `{ error: "Unknown action" }` payload.
//! - **Correlation**: every submission registers a oneshot waiter under its
//!   request id; the dispatcher resolves exactly that waiter when the reply
//!   arrives.
//! - **Fallback**: when the worker context is gone (channel closed), the caller
//!   computes the result synchronously in-thread instead of failing.

use super::protocol::{
    ACTION_GET_SHARD, ACTION_SHARD_DATA, GetShardPayload, ShardDataPayload, ShardJob,
    ShardJobReply, ShardOutcome,
};
use crate::sharding::partitioner;
use crate::sharding::types::{InputGroup, Shard};

use anyhow::Result;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

const JOB_QUEUE_DEPTH: usize = 64;

/// Client handle to the background shard worker.
///
/// Cheap to clone behind an `Arc`; the worker task and the reply dispatcher shut
/// down when the last handle is dropped.
pub struct ShardWorker {
    job_tx: mpsc::Sender<ShardJob>,
    pending: Arc<DashMap<String, oneshot::Sender<ShardJobReply>>>,
}

impl ShardWorker {
    /// Spawns the worker task and the reply dispatcher, returning the handle.
    pub fn spawn() -> Arc<Self> {
        let (job_tx, mut job_rx) = mpsc::channel::<ShardJob>(JOB_QUEUE_DEPTH);
        let (reply_tx, mut reply_rx) = mpsc::channel::<ShardJobReply>(JOB_QUEUE_DEPTH);
        let pending: Arc<DashMap<String, oneshot::Sender<ShardJobReply>>> =
            Arc::new(DashMap::new());

        // Worker: drains jobs, computes, emits replies.
        tokio::spawn(async move {
            while let Some(job) = job_rx.recv().await {
                tracing::debug!("Worker picked up {} job {}", job.action, job.request_id);
                let reply = ShardJobReply {
                    request_id: job.request_id,
                    outcome: execute(&job.action, job.payload),
                };
                if reply_tx.send(reply).await.is_err() {
                    break;
                }
            }
            tracing::info!("Shard worker stopped");
        });

        // Dispatcher: resolves the waiter registered under each reply's id.
        let dispatcher_pending = pending.clone();
        tokio::spawn(async move {
            while let Some(reply) = reply_rx.recv().await {
                match dispatcher_pending.remove(&reply.request_id) {
                    Some((_, waiter)) => {
                        let _ = waiter.send(reply);
                    }
                    None => {
                        tracing::warn!(
                            "Dropping reply with unknown request id {}",
                            reply.request_id
                        );
                    }
                }
            }
        });

        Arc::new(Self { job_tx, pending })
    }

    /// Builds a handle whose worker context is already gone, for exercising the
    /// synchronous fallback path.
    #[cfg(test)]
    pub(crate) fn disconnected() -> Arc<Self> {
        let (job_tx, _) = mpsc::channel(1);
        Arc::new(Self {
            job_tx,
            pending: Arc::new(DashMap::new()),
        })
    }

    /// Submits a raw job and awaits its correlated reply.
    ///
    /// If the worker context is unavailable the result is computed synchronously
    /// on the calling task — degraded, not fatal.
    pub async fn submit(&self, action: &str, payload: serde_json::Value) -> ShardOutcome {
        let request_id = Uuid::new_v4().to_string();
        let (waiter_tx, waiter_rx) = oneshot::channel();
        self.pending.insert(request_id.clone(), waiter_tx);

        let job = ShardJob {
            request_id: request_id.clone(),
            action: action.to_string(),
            payload,
        };

        if let Err(mpsc::error::SendError(job)) = self.job_tx.send(job).await {
            self.pending.remove(&request_id);
            tracing::warn!("Shard worker unavailable, computing on the calling task");
            return execute(&job.action, job.payload);
        }

        match waiter_rx.await {
            Ok(reply) if reply.request_id == request_id => reply.outcome,
            Ok(reply) => {
                tracing::error!(
                    "Reply correlation mismatch: expected {}, got {}",
                    request_id,
                    reply.request_id
                );
                ShardOutcome::Error {
                    error: "Mismatched reply".to_string(),
                }
            }
            Err(_) => {
                self.pending.remove(&request_id);
                tracing::error!("Shard worker dropped request {} mid-flight", request_id);
                ShardOutcome::Error {
                    error: "Worker shut down before replying".to_string(),
                }
            }
        }
    }

    /// Partitions the full dataset on the worker and returns the shard list.
    pub async fn shard_data(
        &self,
        groups: &[InputGroup],
        shard_size: usize,
    ) -> Result<Vec<Shard>> {
        let payload = serde_json::to_value(ShardDataPayload {
            groups: groups.to_vec(),
            shard_size,
        })?;

        match self.submit(ACTION_SHARD_DATA, payload).await {
            ShardOutcome::ShardList(shards) => Ok(shards),
            ShardOutcome::Error { error } => Err(anyhow::anyhow!(error)),
            ShardOutcome::Shard(_) => {
                Err(anyhow::anyhow!("Unexpected single-shard reply to shardData"))
            }
        }
    }

    /// Recomputes a single shard on the worker.
    pub async fn get_shard(
        &self,
        shard_id: u64,
        shard_size: usize,
        groups: &[InputGroup],
    ) -> Result<Shard> {
        let payload = serde_json::to_value(GetShardPayload {
            shard_id,
            shard_size,
            groups: groups.to_vec(),
        })?;

        match self.submit(ACTION_GET_SHARD, payload).await {
            ShardOutcome::Shard(shard) => Ok(shard),
            ShardOutcome::Error { error } => Err(anyhow::anyhow!(error)),
            ShardOutcome::ShardList(_) => {
                Err(anyhow::anyhow!("Unexpected shard-list reply to getShard"))
            }
        }
    }
}

/// Dispatches one action against the pure partitioning functions.
///
/// Failure states are representable as data: malformed payloads and unknown
/// actions both come back as `ShardOutcome::Error`.
pub fn execute(action: &str, payload: serde_json::Value) -> ShardOutcome {
    match action {
        ACTION_SHARD_DATA => match serde_json::from_value::<ShardDataPayload>(payload) {
            Ok(request) => ShardOutcome::ShardList(partitioner::partition(
                &request.groups,
                request.shard_size,
            )),
            Err(e) => ShardOutcome::Error {
                error: format!("Invalid shardData payload: {}", e),
            },
        },
        ACTION_GET_SHARD => match serde_json::from_value::<GetShardPayload>(payload) {
            Ok(request) => ShardOutcome::Shard(partitioner::locate(
                request.shard_id,
                request.shard_size,
                &request.groups,
            )),
            Err(e) => ShardOutcome::Error {
                error: format!("Invalid getShard payload: {}", e),
            },
        },
        _ => ShardOutcome::Error {
            error: "Unknown action".to_string(),
        },
    }
}
