use std::sync::Arc;
use std::time::Duration;

use bit_set::BitSet;
use bridge_crypto::{ConsensusAggregateSignature, ConsensusSignature, PublicKey};
use bridge_interfaces::{CheckpointVote, CheckpointVoteSource};
use bridge_types::{
    build_exit_tree,
    AggregatedSignature,
    BlockRange,
    Checkpoint,
    CheckpointCommitment,
    Epoch,
    ExitEvent,
    QuorumThreshold,
    ValidatorSet,
    H256,
    U256,
};
use bridge_validator_tracker::ValidatorSetTracker;

use crate::CheckpointError;

/// Builds signed checkpoints for batches of child chain blocks.
pub struct CheckpointBuilder {
    tracker: Arc<ValidatorSetTracker>,
    votes: Arc<dyn CheckpointVoteSource>,
    quorum: QuorumThreshold,
    collection_timeout: Duration,
}

impl CheckpointBuilder {
    pub fn new(
        tracker: Arc<ValidatorSetTracker>,
        votes: Arc<dyn CheckpointVoteSource>,
        quorum: QuorumThreshold,
        collection_timeout: Duration,
    ) -> Self {
        Self {
            tracker,
            votes,
            quorum,
            collection_timeout,
        }
    }

    /// Form the commitment for a batch: the event root over `events` in order, bound to the
    /// block range and to the validator set of `epoch`.
    pub fn commitment(
        &self,
        epoch: Epoch,
        range: BlockRange,
        events: &[ExitEvent],
    ) -> Result<(CheckpointCommitment, Arc<ValidatorSet>), CheckpointError> {
        if !range.is_valid() {
            return Err(CheckpointError::InvalidBlockRange(range));
        }

        if let Some(pair) = events
            .windows(2)
            .find(|pair| pair[0].id.checked_add(1) != Some(pair[1].id))
        {
            return Err(CheckpointError::NonSequentialExitEvents {
                range,
                expected: pair[0].id.saturating_add(1),
                found: pair[1].id,
            });
        }

        let validators = self
            .tracker
            .get(epoch)
            .map_err(|_| CheckpointError::UnknownValidatorSet(epoch))?;

        let tree = build_exit_tree(events);
        let commitment = CheckpointCommitment {
            epoch,
            start_block: range.start,
            end_block: range.end,
            event_root: H256(tree.root()),
            validator_set_hash: validators.hash(),
        };

        Ok((commitment, validators))
    }

    /// Build the checkpoint for a batch and collect votes on it until quorum is reached.
    ///
    /// Fails with [`CheckpointError::QuorumNotReached`] if the collection window elapses first.
    /// Nothing collected for a failed or cancelled batch outlives this call.
    pub async fn build(
        &self,
        epoch: Epoch,
        range: BlockRange,
        events: &[ExitEvent],
    ) -> Result<Checkpoint, CheckpointError> {
        let (commitment, validators) = self.commitment(epoch, range, events)?;
        tracing::debug!(
            epoch,
            start_block = range.start,
            end_block = range.end,
            events = events.len(),
            "collecting votes on checkpoint commitment"
        );

        let mut receiver = self
            .votes
            .request_votes(&commitment, &validators)
            .await
            .map_err(|e| CheckpointError::VoteRequest {
                range,
                reason: e.to_string(),
            })?;

        let mut collector = VoteCollector::new(&commitment, &validators, self.quorum);
        let collect = async {
            while let Some(vote) = receiver.recv().await {
                if collector.add(vote) {
                    return true;
                }
            }
            false
        };

        let reached = tokio::time::timeout(self.collection_timeout, collect)
            .await
            .unwrap_or(false);
        if !reached {
            tracing::info!(
                epoch,
                start_block = range.start,
                end_block = range.end,
                collected = %collector.power,
                required = %collector.required,
                "checkpoint quorum not reached"
            );
            return Err(CheckpointError::QuorumNotReached {
                range,
                collected: collector.power,
                required: collector.required,
            });
        }

        let aggregated_signature = collector.aggregate(range)?;
        tracing::info!(
            epoch,
            start_block = range.start,
            end_block = range.end,
            signers = aggregated_signature.signers.len(),
            "built checkpoint"
        );

        Ok(Checkpoint {
            commitment,
            aggregated_signature,
        })
    }
}

/// Accumulates verified votes for one commitment.
struct VoteCollector<'a> {
    digest: [u8; 32],
    validators: &'a ValidatorSet,
    signers: BitSet,
    signatures: Vec<ConsensusSignature>,
    power: U256,
    required: U256,
}

impl<'a> VoteCollector<'a> {
    fn new(
        commitment: &CheckpointCommitment,
        validators: &'a ValidatorSet,
        quorum: QuorumThreshold,
    ) -> Self {
        Self {
            digest: commitment.digest(),
            validators,
            signers: BitSet::with_capacity(validators.len()),
            signatures: Vec::new(),
            power: U256::zero(),
            required: quorum.quorum_size(validators.total_voting_power()),
        }
    }

    /// Add a vote, ignoring it if the sender is not a validator, already voted, or the signature
    /// does not verify. Returns true once the collected power reaches quorum.
    fn add(&mut self, vote: CheckpointVote) -> bool {
        let Some(index) = self.validators.index_of(&vote.validator) else {
            tracing::debug!("ignoring vote from {:?}, not in the validator set", vote.validator);
            return false;
        };
        if self.signers.contains(index) {
            tracing::debug!("ignoring duplicate vote from {:?}", vote.validator);
            return false;
        }
        let Some(validator) = self.validators.get(index) else {
            return false;
        };
        match validator.bls_key.verify(&vote.signature, &self.digest) {
            Ok(true) => {},
            Ok(false) | Err(_) => {
                tracing::debug!("ignoring vote from {:?}, invalid signature", vote.validator);
                return false;
            },
        }

        self.signers.insert(index);
        self.signatures.push(vote.signature);
        self.power = self.power.saturating_add(validator.voting_power);
        self.power >= self.required
    }

    fn aggregate(self, range: BlockRange) -> Result<AggregatedSignature, CheckpointError> {
        let signature = ConsensusAggregateSignature::aggregate(self.signatures.iter()).map_err(
            |e| CheckpointError::InvalidSignature {
                range,
                reason: e.to_string(),
            },
        )?;
        Ok(AggregatedSignature {
            signature,
            signers: self.signers,
        })
    }
}
