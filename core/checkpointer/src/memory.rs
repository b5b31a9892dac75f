use std::collections::BTreeMap;
use std::sync::Arc;

use bridge_types::{BlockNumber, BlockRange, Checkpoint};
use parking_lot::RwLock;

use crate::database::{CheckpointDatabase, CheckpointDatabaseQuery};

/// Admitted checkpoints keyed by start block.
///
/// Stored ranges are pairwise disjoint, so ordering by start also orders by end, and the only
/// stored range that can intersect `[s, e]` is the one with the greatest start `<= e`.
type CheckpointsByStart = BTreeMap<BlockNumber, Checkpoint>;

#[derive(Clone, Default)]
pub struct InMemoryCheckpointDatabase {
    checkpoints: Arc<RwLock<CheckpointsByStart>>,
}

#[derive(Clone)]
pub struct InMemoryCheckpointDatabaseQuery {
    checkpoints: Arc<RwLock<CheckpointsByStart>>,
}

impl InMemoryCheckpointDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

fn find_overlap(checkpoints: &CheckpointsByStart, range: &BlockRange) -> Option<BlockRange> {
    checkpoints
        .range(..=range.end)
        .next_back()
        .map(|(_, checkpoint)| checkpoint.block_range())
        .filter(|existing| existing.overlaps(range))
}

impl CheckpointDatabase for InMemoryCheckpointDatabase {
    type Query = InMemoryCheckpointDatabaseQuery;

    fn query(&self) -> Self::Query {
        InMemoryCheckpointDatabaseQuery {
            checkpoints: self.checkpoints.clone(),
        }
    }

    fn insert_if_disjoint(&self, checkpoint: Checkpoint) -> Result<(), BlockRange> {
        let range = checkpoint.block_range();
        let mut checkpoints = self.checkpoints.write();
        if let Some(existing) = find_overlap(&checkpoints, &range) {
            return Err(existing);
        }
        checkpoints.insert(range.start, checkpoint);
        Ok(())
    }
}

impl CheckpointDatabaseQuery for InMemoryCheckpointDatabaseQuery {
    fn find_overlap(&self, range: &BlockRange) -> Option<BlockRange> {
        find_overlap(&self.checkpoints.read(), range)
    }

    fn get_covering(&self, block: BlockNumber) -> Option<Checkpoint> {
        self.checkpoints
            .read()
            .range(..=block)
            .next_back()
            .map(|(_, checkpoint)| checkpoint)
            .filter(|checkpoint| checkpoint.block_range().contains(block))
            .cloned()
    }

    fn get_next(&self, after: BlockNumber) -> Option<Checkpoint> {
        let start = after.checked_add(1)?;
        self.checkpoints
            .read()
            .range(start..)
            .next()
            .map(|(_, checkpoint)| checkpoint.clone())
    }

    fn get_latest(&self) -> Option<Checkpoint> {
        self.checkpoints
            .read()
            .last_key_value()
            .map(|(_, checkpoint)| checkpoint.clone())
    }

    fn len(&self) -> usize {
        self.checkpoints.read().len()
    }
}
