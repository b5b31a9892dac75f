use bridge_types::{BlockRange, Epoch, ExitEventId, U256};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("Invalid block range {0}")]
    InvalidBlockRange(BlockRange),

    #[error("Exit events of {range} are not sequential: expected id {expected}, found {found}")]
    NonSequentialExitEvents {
        range: BlockRange,
        expected: ExitEventId,
        found: ExitEventId,
    },

    #[error("Unknown validator set for epoch {0}")]
    UnknownValidatorSet(Epoch),

    #[error("Validator set does not match the one recorded for epoch {0}")]
    ValidatorSetMismatch(Epoch),

    #[error("Block range {range} overlaps admitted checkpoint {existing}")]
    RangeOverlap {
        range: BlockRange,
        existing: BlockRange,
    },

    #[error("Insufficient signature for {range}: signed power {signed}, quorum {required}")]
    InsufficientSignature {
        range: BlockRange,
        signed: U256,
        required: U256,
    },

    #[error("Invalid signature for {range}: {reason}")]
    InvalidSignature { range: BlockRange, reason: String },

    #[error("Quorum not reached for {range}: collected power {collected}, quorum {required}")]
    QuorumNotReached {
        range: BlockRange,
        collected: U256,
        required: U256,
    },

    #[error("Failed to request votes for {range}: {reason}")]
    VoteRequest { range: BlockRange, reason: String },
}

impl CheckpointError {
    /// Whether the same submission may succeed later without changes, once the missing
    /// validator set is recorded or more validators respond.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::UnknownValidatorSet(_) | Self::QuorumNotReached { .. } | Self::VoteRequest { .. }
        )
    }
}
