//! Worker Module Tests
//!
//! Validates the message protocol and the execution engine.
//!
//! ## Test Scopes
//! - **Dispatch**: known actions produce the same output as the pure functions;
//!   unknown actions and malformed payloads come back as typed errors.
//! - **Correlation**: concurrent in-flight requests each receive their own reply.
//! - **Fallback**: a handle with no live worker context still answers.

#[cfg(test)]
mod tests {
    use crate::sharding::partitioner::partition;
    use crate::sharding::types::{InputGroup, InputRow};
    use crate::worker::executor::{ShardWorker, execute};
    use crate::worker::protocol::{ACTION_GET_SHARD, ShardOutcome};

    fn row(id: u64) -> InputRow {
        InputRow {
            id,
            vm_name: format!("vm-{:03}", id),
            ip_address: format!("192.168.1.{}", id % 250 + 1),
            subnet_mask: "255.255.255.0".to_string(),
            default_gateway: "192.168.1.1".to_string(),
        }
    }

    fn group(name: &str, ids: std::ops::Range<u64>) -> InputGroup {
        InputGroup {
            group_name: name.to_string(),
            rows: ids.map(row).collect(),
        }
    }

    // ============================================================
    // DISPATCH TESTS
    // ============================================================

    #[tokio::test]
    async fn test_shard_data_matches_pure_partition() {
        let worker = ShardWorker::spawn();
        let groups = vec![group("rack-a", 0..4), group("rack-b", 4..12)];

        let shards = worker.shard_data(&groups, 5).await.unwrap();

        assert_eq!(shards, partition(&groups, 5));
    }

    #[tokio::test]
    async fn test_get_shard_matches_partition_element() {
        let worker = ShardWorker::spawn();
        let groups = vec![group("rack-a", 0..7), group("rack-b", 7..12)];
        let expected = partition(&groups, 4);

        for shard in &expected {
            let located = worker.get_shard(shard.shard_id, 4, &groups).await.unwrap();
            assert_eq!(&located, shard);
        }
    }

    #[tokio::test]
    async fn test_get_shard_out_of_range_returns_empty_shard() {
        let worker = ShardWorker::spawn();
        let groups = vec![group("rack-a", 0..4)];

        let shard = worker.get_shard(42, 5, &groups).await.unwrap();

        assert_eq!(shard.shard_id, 42);
        assert!(shard.groups.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_action_yields_typed_error() {
        let worker = ShardWorker::spawn();

        let outcome = worker
            .submit("reticulateSplines", serde_json::json!({}))
            .await;

        assert_eq!(
            outcome,
            ShardOutcome::Error {
                error: "Unknown action".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_payload_yields_typed_error() {
        let worker = ShardWorker::spawn();

        let outcome = worker
            .submit(ACTION_GET_SHARD, serde_json::json!({"bogus": true}))
            .await;

        match outcome {
            ShardOutcome::Error { error } => {
                assert!(error.contains("Invalid getShard payload"))
            }
            other => panic!("expected error outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_execute_unknown_action_without_runtime() {
        // The dispatch function itself is pure and usable as the in-thread fallback
        let outcome = execute("nope", serde_json::json!({}));

        assert_eq!(
            outcome,
            ShardOutcome::Error {
                error: "Unknown action".to_string()
            }
        );
    }

    // ============================================================
    // CORRELATION TESTS
    // ============================================================

    #[tokio::test]
    async fn test_concurrent_requests_resolve_to_their_own_replies() {
        let worker = ShardWorker::spawn();
        let groups = vec![group("rack-a", 0..30)];
        let expected = partition(&groups, 3);

        let mut handles = Vec::new();
        for shard in &expected {
            let worker = worker.clone();
            let groups = groups.clone();
            let shard_id = shard.shard_id;
            handles.push(tokio::spawn(async move {
                worker.get_shard(shard_id, 3, &groups).await.unwrap()
            }));
        }

        for (handle, expected_shard) in handles.into_iter().zip(&expected) {
            let located = handle.await.unwrap();
            assert_eq!(&located, expected_shard);
        }
    }

    // ============================================================
    // FALLBACK TESTS
    // ============================================================

    #[tokio::test]
    async fn test_disconnected_worker_falls_back_in_thread() {
        let worker = ShardWorker::disconnected();
        let groups = vec![group("rack-a", 0..4), group("rack-b", 4..12)];

        let shards = worker.shard_data(&groups, 5).await.unwrap();
        assert_eq!(shards, partition(&groups, 5));

        let shard = worker.get_shard(1, 5, &groups).await.unwrap();
        assert_eq!(shard, partition(&groups, 5)[1]);
    }
}
