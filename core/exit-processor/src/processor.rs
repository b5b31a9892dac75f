use bridge_checkpointer::CheckpointDatabaseQuery;
use bridge_types::{BlockNumber, EventCodec, ExitEvent, ExitEventId, ExitProof, ExitResult, H256};
use tokio::sync::broadcast;

use crate::{ExitProcessingError, LocalProcessedExits, ProcessedExitsRegistry};

/// Capacity of the processing result channel.
const RESULT_CHANNEL_CAPACITY: usize = 1024;

/// The idempotency guard for exit claims.
///
/// Each exit id moves from unseen to processed exactly once. Validation reads only admitted
/// checkpoints, and the final transition is a compare-and-swap on the id in the registry, so
/// claims for different ids never wait on each other.
pub struct ExitProcessor<
    Q: CheckpointDatabaseQuery,
    R: ProcessedExitsRegistry = LocalProcessedExits,
> {
    checkpoints: Q,
    registry: R,
    results: broadcast::Sender<ExitResult>,
}

impl<Q: CheckpointDatabaseQuery> ExitProcessor<Q, LocalProcessedExits> {
    pub fn new(checkpoints: Q) -> Self {
        Self::with_registry(checkpoints, LocalProcessedExits::new())
    }
}

impl<Q: CheckpointDatabaseQuery, R: ProcessedExitsRegistry> ExitProcessor<Q, R> {
    pub fn with_registry(checkpoints: Q, registry: R) -> Self {
        let (results, _) = broadcast::channel(RESULT_CHANNEL_CAPACITY);
        Self {
            checkpoints,
            registry,
            results,
        }
    }

    /// Subscribe to the results of processed exits.
    pub fn subscribe(&self) -> broadcast::Receiver<ExitResult> {
        self.results.subscribe()
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Process an exit claim against the checkpoint covering `checkpoint_block`.
    ///
    /// Rejections never change state. On success the id is marked processed and the result is
    /// announced to subscribers.
    pub fn process_exit(
        &self,
        checkpoint_block: BlockNumber,
        event: &ExitEvent,
        proof: &ExitProof,
    ) -> Result<ExitResult, ExitProcessingError> {
        let checkpoint = self
            .checkpoints
            .get_covering(checkpoint_block)
            .ok_or(ExitProcessingError::UnknownCheckpoint(checkpoint_block))?;

        if !event.verify_inclusion(&checkpoint.event_root(), proof) {
            tracing::debug!(
                exit_id = event.id,
                checkpoint_block,
                "rejected exit claim with invalid proof"
            );
            return Err(ExitProcessingError::InvalidProof {
                id: event.id,
                checkpoint_block,
            });
        }

        if !self.registry.try_mark_processed(event.id) {
            tracing::debug!(exit_id = event.id, "exit already processed");
            return Err(ExitProcessingError::AlreadyProcessed(event.id));
        }

        let result = ExitResult {
            id: event.id,
            success: true,
        };
        tracing::info!(exit_id = event.id, checkpoint_block, "processed exit");
        // No subscribers is fine, the registry is the record.
        let _ = self.results.send(result);

        Ok(result)
    }

    /// Process a claim in its root chain call form: the canonically encoded event, its leaf
    /// index and the sibling path.
    pub fn process_encoded_exit(
        &self,
        checkpoint_block: BlockNumber,
        leaf_index: u64,
        encoded_event: &[u8],
        sibling_path: &[H256],
    ) -> Result<ExitResult, ExitProcessingError> {
        let event = ExitEvent::decode(encoded_event)?;
        let proof = ExitProof {
            leaf_index,
            sibling_path: sibling_path.to_vec(),
        };
        self.process_exit(checkpoint_block, &event, &proof)
    }

    pub fn is_processed(&self, id: ExitEventId) -> bool {
        self.registry.is_processed(id)
    }
}
