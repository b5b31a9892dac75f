use bridge_types::{BlockNumber, ExitEventId, H256};
use exit_tree::MerkleTreeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExitProofError {
    #[error("Exit event {0} is not in any checkpoint yet")]
    EventNotInAnyCheckpoint(ExitEventId),

    #[error("Exit event {0} was never emitted")]
    EventNotFound(ExitEventId),

    #[error("No checkpointed batch ends at block {0}")]
    UnknownCheckpoint(BlockNumber),

    #[error("Exit event {id} is not in the checkpoint at block {checkpoint_block}")]
    EventNotInCheckpoint {
        id: ExitEventId,
        checkpoint_block: BlockNumber,
    },

    #[error("Batch of checkpoint {checkpoint_block} does not match its event root {event_root:?}")]
    EventRootMismatch {
        checkpoint_block: BlockNumber,
        event_root: H256,
    },

    #[error("Exit events of checkpoint {0} are not sequential")]
    NonSequentialBatch(BlockNumber),

    #[error("Batch of checkpoint {checkpoint_block} overlaps exit ids of another batch")]
    OverlappingBatch { checkpoint_block: BlockNumber },

    #[error(transparent)]
    Tree(#[from] MerkleTreeError),
}

impl ExitProofError {
    /// An event that is not checkpointed yet will be after a later checkpoint interval.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::EventNotInAnyCheckpoint(_))
    }
}
