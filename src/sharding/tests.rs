//! Sharding Module Tests
//!
//! Validates the partitioning core against its required properties.
//!
//! ## Test Scopes
//! - **Partition**: window boundaries, row conservation, determinism, edge cases.
//! - **Locate**: single-shard recomputation must match the full partition.

#[cfg(test)]
mod tests {
    use crate::sharding::partitioner::{locate, partition};
    use crate::sharding::types::{InputGroup, InputRow, Shard, ShardedInputGroups};

    fn row(id: u64) -> InputRow {
        InputRow {
            id,
            vm_name: format!("vm-{:03}", id),
            ip_address: format!("10.0.0.{}", id % 250 + 1),
            subnet_mask: "255.255.255.0".to_string(),
            default_gateway: "10.0.0.1".to_string(),
        }
    }

    fn group(name: &str, ids: std::ops::Range<u64>) -> InputGroup {
        InputGroup {
            group_name: name.to_string(),
            rows: ids.map(row).collect(),
        }
    }

    fn row_ids(group: &InputGroup) -> Vec<u64> {
        group.rows.iter().map(|r| r.id).collect()
    }

    // ============================================================
    // PARTITION TESTS
    // ============================================================

    #[test]
    fn test_partition_scenario_three_groups_size_five() {
        // 3 groups with row counts {4, 3, 5}, shard size 5
        let groups = vec![
            group("cluster-a", 0..4),
            group("cluster-b", 4..7),
            group("cluster-c", 7..12),
        ];

        let shards = partition(&groups, 5);
        assert_eq!(shards.len(), 3);

        // Shard 0: all of cluster-a plus the first row of cluster-b
        assert_eq!(shards[0].shard_id, 0);
        assert_eq!(shards[0].groups.len(), 2);
        assert_eq!(shards[0].groups[0].group_name, "cluster-a");
        assert_eq!(row_ids(&shards[0].groups[0]), vec![0, 1, 2, 3]);
        assert_eq!(shards[0].groups[1].group_name, "cluster-b");
        assert_eq!(row_ids(&shards[0].groups[1]), vec![4]);

        // Shard 1: the rest of cluster-b plus the first three rows of cluster-c
        assert_eq!(shards[1].shard_id, 1);
        assert_eq!(shards[1].groups.len(), 2);
        assert_eq!(shards[1].groups[0].group_name, "cluster-b");
        assert_eq!(row_ids(&shards[1].groups[0]), vec![5, 6]);
        assert_eq!(shards[1].groups[1].group_name, "cluster-c");
        assert_eq!(row_ids(&shards[1].groups[1]), vec![7, 8, 9]);

        // Shard 2: the final two rows of cluster-c, shorter than shard size
        assert_eq!(shards[2].shard_id, 2);
        assert_eq!(shards[2].groups.len(), 1);
        assert_eq!(shards[2].groups[0].group_name, "cluster-c");
        assert_eq!(row_ids(&shards[2].groups[0]), vec![10, 11]);
    }

    #[test]
    fn test_partition_empty_input_yields_no_shards() {
        let shards = partition(&[], 5);
        assert!(shards.is_empty());

        // A group list with only empty groups flattens to zero rows as well
        let empty_groups = vec![InputGroup {
            group_name: "empty".to_string(),
            rows: vec![],
        }];
        assert!(partition(&empty_groups, 5).is_empty());
    }

    #[test]
    fn test_partition_shard_size_larger_than_total() {
        let groups = vec![group("cluster-a", 0..4), group("cluster-b", 4..7)];

        let shards = partition(&groups, 100);

        assert_eq!(shards.len(), 1);
        assert_eq!(shards[0].shard_id, 0);
        assert_eq!(shards[0].row_count(), 7);
        assert_eq!(shards[0].groups.len(), 2);
    }

    #[test]
    fn test_partition_conserves_rows() {
        let groups = vec![
            group("cluster-a", 0..13),
            group("cluster-b", 13..20),
            group("cluster-c", 20..41),
        ];

        for shard_size in 1..=45 {
            let shards = partition(&groups, shard_size);
            let total: usize = shards.iter().map(Shard::row_count).sum();
            assert_eq!(total, 41, "row count must be conserved at size {}", shard_size);
            assert_eq!(shards.len(), 41usize.div_ceil(shard_size));
        }
    }

    #[test]
    fn test_partition_never_emits_empty_groups() {
        let groups = vec![
            group("cluster-a", 0..6),
            group("cluster-b", 6..7),
            group("cluster-c", 7..19),
        ];

        for shard_size in 1..=20 {
            for shard in partition(&groups, shard_size) {
                for group in &shard.groups {
                    assert!(
                        !group.rows.is_empty(),
                        "shard {} carries empty group {}",
                        shard.shard_id,
                        group.group_name
                    );
                }
            }
        }
    }

    #[test]
    fn test_partition_ids_are_dense_and_zero_based() {
        let groups = vec![group("cluster-a", 0..17)];

        let shards = partition(&groups, 4);

        assert_eq!(shards.len(), 5);
        for (index, shard) in shards.iter().enumerate() {
            assert_eq!(shard.shard_id, index as u64);
        }
    }

    #[test]
    fn test_partition_is_deterministic() {
        let groups = vec![group("cluster-a", 0..9), group("cluster-b", 9..25)];

        let first = partition(&groups, 6);
        let second = partition(&groups, 6);

        assert_eq!(first, second);
    }

    #[test]
    fn test_partition_zero_shard_size_yields_no_shards() {
        let groups = vec![group("cluster-a", 0..5)];
        assert!(partition(&groups, 0).is_empty());
    }

    // ============================================================
    // LOCATE TESTS
    // ============================================================

    #[test]
    fn test_locate_matches_partition_at_every_index() {
        let groups = vec![
            group("cluster-a", 0..4),
            group("cluster-b", 4..7),
            group("cluster-c", 7..12),
        ];

        for shard_size in 1..=13 {
            let shards = partition(&groups, shard_size);
            for expected in &shards {
                let located = locate(expected.shard_id, shard_size, &groups);
                assert_eq!(&located, expected, "mismatch at size {}", shard_size);
            }
        }
    }

    #[test]
    fn test_locate_out_of_range_returns_empty_shard() {
        let groups = vec![group("cluster-a", 0..4)];

        let shard = locate(99, 5, &groups);

        assert_eq!(shard.shard_id, 99);
        assert!(shard.groups.is_empty());
    }

    // ============================================================
    // AGGREGATE TESTS
    // ============================================================

    #[test]
    fn test_validate_accepts_partition_output() {
        let groups = vec![group("cluster-a", 0..4), group("cluster-b", 4..12)];
        let shards = partition(&groups, 5);

        let sharded = ShardedInputGroups {
            total_rows: 12,
            shard_size: 5,
            shards,
        };

        assert!(sharded.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_row_total_mismatch() {
        let groups = vec![group("cluster-a", 0..4)];
        let sharded = ShardedInputGroups {
            total_rows: 99,
            shard_size: 5,
            shards: partition(&groups, 5),
        };

        let error = sharded.validate().unwrap_err();
        assert!(error.to_string().contains("totalRows"));
    }

    #[test]
    fn test_validate_rejects_sparse_shard_ids() {
        let groups = vec![group("cluster-a", 0..10)];
        let mut shards = partition(&groups, 5);
        shards[1].shard_id = 7;

        let sharded = ShardedInputGroups {
            total_rows: 10,
            shard_size: 5,
            shards,
        };

        assert!(sharded.validate().is_err());
    }

    #[test]
    fn test_source_groups_rejoins_boundary_splits() {
        let groups = vec![
            group("cluster-a", 0..4),
            group("cluster-b", 4..7),
            group("cluster-c", 7..12),
        ];

        let sharded = ShardedInputGroups {
            total_rows: 12,
            shard_size: 5,
            shards: partition(&groups, 5),
        };

        assert_eq!(sharded.source_groups(), groups);
    }
}
