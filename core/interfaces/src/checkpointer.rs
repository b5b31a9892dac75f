use async_trait::async_trait;
use bridge_crypto::ConsensusSignature;
use bridge_types::{Checkpoint, CheckpointCommitment, ValidatorSet};
use ethers::types::Address;
use tokio::sync::mpsc;

/// A validator's signature over a checkpoint commitment digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointVote {
    pub validator: Address,
    pub signature: ConsensusSignature,
}

/// Delivers validator votes on checkpoint commitments.
#[async_trait]
pub trait CheckpointVoteSource: Send + Sync {
    /// Ask the validators of the given set to sign the commitment. Votes arrive on the returned
    /// channel in any order and may be invalid; dropping the receiver abandons the request.
    async fn request_votes(
        &self,
        commitment: &CheckpointCommitment,
        validators: &ValidatorSet,
    ) -> anyhow::Result<mpsc::Receiver<CheckpointVote>>;
}

/// The destination of fully signed checkpoints, usually the root chain checkpoint manager.
#[async_trait]
pub trait CheckpointSink: Send + Sync {
    async fn submit_checkpoint(
        &self,
        checkpoint: &Checkpoint,
        validators: &ValidatorSet,
    ) -> anyhow::Result<()>;
}
