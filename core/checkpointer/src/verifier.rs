use std::sync::Arc;

use async_trait::async_trait;
use bridge_interfaces::CheckpointSink;
use bridge_types::{BlockNumber, Checkpoint, QuorumThreshold, ValidatorSet};
use bridge_validator_tracker::ValidatorSetTracker;

use crate::database::{CheckpointDatabase, CheckpointDatabaseQuery};
use crate::CheckpointError;

/// The root chain's admission check for checkpoints.
///
/// Admission is linearizable per block range: two admissions racing for intersecting ranges
/// cannot both succeed, the overlap check is repeated atomically with the write.
pub struct CheckpointVerifier<D: CheckpointDatabase> {
    tracker: Arc<ValidatorSetTracker>,
    db: D,
    quorum: QuorumThreshold,
}

impl<D: CheckpointDatabase> CheckpointVerifier<D> {
    pub fn new(tracker: Arc<ValidatorSetTracker>, db: D, quorum: QuorumThreshold) -> Self {
        Self {
            tracker,
            db,
            quorum,
        }
    }

    pub fn query(&self) -> D::Query {
        self.db.query()
    }

    /// Admit a checkpoint signed by the given validator set. On success the checkpoint is
    /// appended to the store and can never be removed; on failure nothing is written.
    pub fn admit(
        &self,
        checkpoint: Checkpoint,
        validator_set: &ValidatorSet,
    ) -> Result<(), CheckpointError> {
        let epoch = validator_set.epoch();
        let range = checkpoint.block_range();

        let recorded = self
            .tracker
            .get(epoch)
            .map_err(|_| CheckpointError::UnknownValidatorSet(epoch))?;
        if checkpoint.epoch() != epoch
            || recorded.as_ref() != validator_set
            || checkpoint.commitment.validator_set_hash != recorded.hash()
        {
            return Err(CheckpointError::ValidatorSetMismatch(epoch));
        }

        if !range.is_valid() {
            return Err(CheckpointError::InvalidBlockRange(range));
        }

        if let Some(existing) = self.db.query().find_overlap(&range) {
            return Err(CheckpointError::RangeOverlap { range, existing });
        }

        let signature = &checkpoint.aggregated_signature;
        let signed = recorded
            .signers_power(&signature.signers)
            .ok_or_else(|| CheckpointError::InvalidSignature {
                range,
                reason: "signer bitmap references an unknown validator".into(),
            })?;
        let required = self.quorum.quorum_size(recorded.total_voting_power());
        if signed < required {
            return Err(CheckpointError::InsufficientSignature {
                range,
                signed,
                required,
            });
        }

        let keys = recorded
            .signer_keys(&signature.signers)
            .unwrap_or_default();
        match signature
            .signature
            .verify(&keys, &checkpoint.commitment.digest())
        {
            Ok(true) => {},
            Ok(false) => {
                return Err(CheckpointError::InvalidSignature {
                    range,
                    reason: "aggregate signature does not verify".into(),
                });
            },
            Err(e) => {
                return Err(CheckpointError::InvalidSignature {
                    range,
                    reason: e.to_string(),
                });
            },
        }

        // A concurrent admission may have claimed an intersecting range since the first check.
        self.db
            .insert_if_disjoint(checkpoint)
            .map_err(|existing| CheckpointError::RangeOverlap { range, existing })?;

        tracing::info!(
            epoch,
            start_block = range.start,
            end_block = range.end,
            signed = %signed,
            "admitted checkpoint"
        );
        Ok(())
    }

    /// Returns the admitted checkpoint whose range contains `block`.
    pub fn checkpoint_covering(&self, block: BlockNumber) -> Option<Checkpoint> {
        self.db.query().get_covering(block)
    }

    pub fn latest_checkpoint(&self) -> Option<Checkpoint> {
        self.db.query().get_latest()
    }
}

/// Submitting to a verifier admits the checkpoint directly, for a root chain that runs in
/// process.
#[async_trait]
impl<D: CheckpointDatabase + 'static> CheckpointSink for CheckpointVerifier<D> {
    async fn submit_checkpoint(
        &self,
        checkpoint: &Checkpoint,
        validators: &ValidatorSet,
    ) -> anyhow::Result<()> {
        self.admit(checkpoint.clone(), validators)?;
        Ok(())
    }
}
