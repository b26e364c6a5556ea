use super::types::{InputGroup, Shard};

/// Partitions grouped rows into contiguous shards of at most `shard_size` rows.
///
/// The flattened row sequence (all groups' rows in source order) is sliced into
/// `ceil(total / shard_size)` windows; the last window may be shorter and is
/// never padded. Empty input yields no shards, as does a zero shard size.
/// Row ids are assumed globally unique — that is the caller's contract.
pub fn partition(groups: &[InputGroup], shard_size: usize) -> Vec<Shard> {
    if shard_size == 0 {
        return Vec::new();
    }

    let total_rows: usize = groups.iter().map(|group| group.rows.len()).sum();
    let shard_count = total_rows.div_ceil(shard_size);

    (0..shard_count as u64)
        .map(|shard_id| window(shard_id, shard_size, groups))
        .collect()
}

/// Recomputes a single shard without materializing the rest of the partition.
///
/// For any in-range id this returns exactly `partition(groups, shard_size)[id]`
/// — both paths share [`window`], so the equivalence holds by construction.
/// An out-of-range id yields a shard with an empty group list, not an error;
/// callers guard navigation against the row total themselves.
pub fn locate(shard_id: u64, shard_size: usize, groups: &[InputGroup]) -> Shard {
    if shard_size == 0 {
        return Shard {
            shard_id,
            groups: Vec::new(),
        };
    }

    window(shard_id, shard_size, groups)
}

/// Cuts the row-index window `[shard_id * shard_size, .. + shard_size)` out of
/// the flattened sequence, keeping per-group structure and relative row order.
/// Groups with no rows inside the window are dropped.
fn window(shard_id: u64, shard_size: usize, groups: &[InputGroup]) -> Shard {
    let start = (shard_id as usize).saturating_mul(shard_size);
    let end = start.saturating_add(shard_size);

    let mut offset = 0usize;
    let mut shard_groups = Vec::new();

    for group in groups {
        let group_start = offset;
        let group_end = offset + group.rows.len();
        offset = group_end;

        let lo = group_start.max(start);
        let hi = group_end.min(end);

        if lo < hi {
            shard_groups.push(InputGroup {
                group_name: group.group_name.clone(),
                rows: group.rows[lo - group_start..hi - group_start].to_vec(),
            });
        }
    }

    Shard {
        shard_id,
        groups: shard_groups,
    }
}
