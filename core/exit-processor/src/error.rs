use bridge_types::{BlockNumber, CodecError, ExitEventId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExitProcessingError {
    #[error("No admitted checkpoint covers block {0}")]
    UnknownCheckpoint(BlockNumber),

    #[error("Invalid proof for exit {id} against checkpoint {checkpoint_block}")]
    InvalidProof {
        id: ExitEventId,
        checkpoint_block: BlockNumber,
    },

    #[error("Exit {0} is already processed")]
    AlreadyProcessed(ExitEventId),

    #[error(transparent)]
    MalformedEvent(#[from] CodecError),
}

impl ExitProcessingError {
    /// A duplicate claim is the expected outcome of concurrent or repeated submission, not a
    /// failure of the exit.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::AlreadyProcessed(_))
    }

    /// The checkpoint may be admitted later.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::UnknownCheckpoint(_))
    }
}
