use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bridge_interfaces::ConfigConsumer;
use bridge_types::{
    build_exit_tree,
    is_sequential,
    BlockNumber,
    CheckpointedBatch,
    ExitEvent,
    ExitEventId,
    ExitProofResponse,
    H256,
};
use exit_tree::hashers::keccak::KeccakHasher;
use exit_tree::MerkleTree;
use lru::LruCache;
use parking_lot::{Mutex, RwLock};

use crate::{ExitProofConfig, ExitProofError};

type ExitTree = MerkleTree<KeccakHasher>;

/// The exit events of one checkpoint, in tree order.
struct Batch {
    checkpoint_block: BlockNumber,
    event_root: H256,
    events: Vec<ExitEvent>,
}

impl Batch {
    fn first_id(&self) -> Option<ExitEventId> {
        self.events.first().map(|e| e.id)
    }

    fn last_id(&self) -> Option<ExitEventId> {
        self.events.last().map(|e| e.id)
    }

    /// The leaf index of the event with the given id. Ids in a batch are sequential.
    fn index_of(&self, id: ExitEventId) -> Option<usize> {
        let first = self.first_id()?;
        let index = usize::try_from(id.checked_sub(first)?).ok()?;
        (index < self.events.len()).then_some(index)
    }
}

/// Serves inclusion proofs for exit events of checkpointed batches.
///
/// Batches are indexed by their first exit id, so finding the batch of an id is a range lookup.
/// Trees are kept in an LRU cache and rebuilt from the batch events on a miss.
pub struct ExitProofService {
    by_first_id: RwLock<BTreeMap<ExitEventId, Arc<Batch>>>,
    by_checkpoint_block: RwLock<BTreeMap<BlockNumber, Arc<Batch>>>,
    trees: Mutex<LruCache<BlockNumber, Arc<ExitTree>>>,
    /// One past the highest exit id known to be emitted, zero if none.
    emitted: AtomicU64,
}

impl ExitProofService {
    pub fn new(config: ExitProofConfig) -> Self {
        let capacity = NonZeroUsize::new(config.tree_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            by_first_id: Default::default(),
            by_checkpoint_block: Default::default(),
            trees: Mutex::new(LruCache::new(capacity)),
            emitted: AtomicU64::new(0),
        }
    }

    /// Note that an exit event with this id was emitted on the child chain, even if it is not
    /// checkpointed yet.
    pub fn record_emitted(&self, id: ExitEventId) {
        self.emitted.fetch_max(id.saturating_add(1), Ordering::AcqRel);
    }

    /// Index the events of a submitted checkpoint.
    ///
    /// The events must hash to the checkpoint's event root. Registering the same batch again is
    /// a no-op.
    pub fn register_batch(&self, batch: &CheckpointedBatch) -> Result<(), ExitProofError> {
        let checkpoint_block = batch.checkpoint.checkpoint_block();
        let event_root = batch.checkpoint.event_root();

        if !is_sequential(&batch.events) {
            return Err(ExitProofError::NonSequentialBatch(checkpoint_block));
        }

        let tree = build_exit_tree(&batch.events);
        if H256(tree.root()) != event_root {
            return Err(ExitProofError::EventRootMismatch {
                checkpoint_block,
                event_root,
            });
        }

        if let Some(existing) = self.by_checkpoint_block.read().get(&checkpoint_block) {
            if existing.event_root == event_root {
                return Ok(());
            }
            return Err(ExitProofError::OverlappingBatch { checkpoint_block });
        }

        let entry = Arc::new(Batch {
            checkpoint_block,
            event_root,
            events: batch.events.clone(),
        });

        if let (Some(first), Some(last)) = (entry.first_id(), entry.last_id()) {
            let mut by_first_id = self.by_first_id.write();
            let overlaps_previous = by_first_id
                .range(..=last)
                .next_back()
                .and_then(|(_, b)| b.last_id())
                .is_some_and(|previous_last| previous_last >= first);
            if overlaps_previous {
                return Err(ExitProofError::OverlappingBatch { checkpoint_block });
            }
            by_first_id.insert(first, entry.clone());
            self.record_emitted(last);
        }

        self.by_checkpoint_block
            .write()
            .insert(checkpoint_block, entry.clone());
        self.trees.lock().put(checkpoint_block, Arc::new(tree));

        tracing::debug!(
            checkpoint_block,
            events = entry.events.len(),
            "registered checkpoint batch"
        );
        Ok(())
    }

    /// Returns the proof for the exit event with the given id, from the checkpoint that
    /// contains it.
    pub fn get_proof(&self, id: ExitEventId) -> Result<ExitProofResponse, ExitProofError> {
        let batch = self
            .by_first_id
            .read()
            .range(..=id)
            .next_back()
            .map(|(_, batch)| batch.clone());

        match batch {
            Some(batch) if batch.index_of(id).is_some() => self.prove(&batch, id),
            _ if id < self.emitted.load(Ordering::Acquire) => {
                Err(ExitProofError::EventNotInAnyCheckpoint(id))
            },
            _ => Err(ExitProofError::EventNotFound(id)),
        }
    }

    /// Returns the proof for the exit event with the given id from the checkpoint at
    /// `checkpoint_block`.
    pub fn get_proof_at(
        &self,
        checkpoint_block: BlockNumber,
        id: ExitEventId,
    ) -> Result<ExitProofResponse, ExitProofError> {
        let batch = self
            .by_checkpoint_block
            .read()
            .get(&checkpoint_block)
            .cloned()
            .ok_or(ExitProofError::UnknownCheckpoint(checkpoint_block))?;
        if batch.index_of(id).is_none() {
            return Err(ExitProofError::EventNotInCheckpoint {
                id,
                checkpoint_block,
            });
        }
        self.prove(&batch, id)
    }

    pub fn is_registered(&self, checkpoint_block: BlockNumber) -> bool {
        self.by_checkpoint_block
            .read()
            .contains_key(&checkpoint_block)
    }

    fn prove(&self, batch: &Batch, id: ExitEventId) -> Result<ExitProofResponse, ExitProofError> {
        let index = batch.index_of(id).ok_or(ExitProofError::EventNotInCheckpoint {
            id,
            checkpoint_block: batch.checkpoint_block,
        })?;
        let tree = self.tree(batch);
        let proof = tree.prove(index)?;

        tracing::trace!(
            exit_id = id,
            checkpoint_block = batch.checkpoint_block,
            leaf_index = index,
            "generated exit proof"
        );
        Ok(ExitProofResponse::new(
            proof.into(),
            batch.checkpoint_block,
            batch.events[index].clone(),
        ))
    }

    fn tree(&self, batch: &Batch) -> Arc<ExitTree> {
        if let Some(tree) = self.trees.lock().get(&batch.checkpoint_block) {
            return tree.clone();
        }

        // Build outside the lock, two concurrent misses build the same tree twice.
        let tree = Arc::new(build_exit_tree(&batch.events));
        debug_assert_eq!(H256(tree.root()), batch.event_root);
        self.trees.lock().put(batch.checkpoint_block, tree.clone());
        tree
    }
}

impl ConfigConsumer for ExitProofService {
    const KEY: &'static str = "exit_proof";

    type Config = ExitProofConfig;
}
