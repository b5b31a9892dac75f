use bridge_interfaces::{CallError, TransactionError};
use bridge_rpc::EVENT_NOT_CHECKPOINTED_CODE;
use bridge_types::{BlockNumber, Epoch, ExitEventId, H256};
use bridge_validator_tracker::ValidatorSetError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayerError {
    #[error("Could not reach the proof server for exit {exit_id}: {reason}")]
    ProofTransport { exit_id: ExitEventId, reason: String },

    #[error("No proof for exit {exit_id} ({code}): {message}")]
    ProofUnavailable {
        exit_id: ExitEventId,
        code: i32,
        message: String,
    },

    #[error("Exit {0} is already processed")]
    AlreadyProcessed(ExitEventId),

    #[error(transparent)]
    Call(#[from] CallError),

    #[error("Exit {exit_id} transaction failed: {source}")]
    Transaction {
        exit_id: ExitEventId,
        #[source]
        source: TransactionError,
    },

    #[error("Exit {exit_id} transaction {tx_hash:?} reverted at checkpoint {checkpoint_block}")]
    Reverted {
        exit_id: ExitEventId,
        checkpoint_block: BlockNumber,
        tx_hash: H256,
    },

    #[error("Exit {exit_id} transaction {tx_hash:?} announced no result")]
    MissingExitResult { exit_id: ExitEventId, tx_hash: H256 },

    #[error("Exit {exit_id} was processed but its call failed")]
    ExitFailed { exit_id: ExitEventId, tx_hash: H256 },

    #[error("Exit {0} is not reported as processed")]
    NotConfirmed(ExitEventId),

    #[error("Could not decode root chain data: {0}")]
    Decode(String),

    #[error(transparent)]
    ValidatorSet(#[from] ValidatorSetError),

    #[error("Validator set of epoch {epoch} differs from the root chain")]
    ValidatorSetOutOfSync { epoch: Epoch, mismatches: usize },
}

impl RelayerError {
    /// The exit was honored before, by this relayer or another one.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::AlreadyProcessed(_))
    }

    pub fn is_retriable(&self) -> bool {
        match self {
            Self::ProofTransport { .. } | Self::NotConfirmed(_) => true,
            Self::ProofUnavailable { code, .. } => *code == EVENT_NOT_CHECKPOINTED_CODE,
            Self::Call(CallError::Transport(_)) => true,
            Self::Transaction { source, .. } => !matches!(source, TransactionError::Rejected(_)),
            Self::ValidatorSet(e) => e.is_retriable(),
            _ => false,
        }
    }
}

