use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bridge_checkpointer::CheckpointDatabaseQuery;
use bridge_interfaces::ChildChainSource;
use bridge_types::{CheckpointedBatch, ExitEventId};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::ExitProofService;

/// How often a failed resync is tried again.
const RESYNC_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Everything the proof service follows to stay current with the checkpointer.
///
/// Announced batches are the fast path. The checkpoint store and the child chain are the source
/// of truth, any batch missed on the channel is rebuilt from them.
pub struct ProofFeed<Q> {
    pub batches: broadcast::Receiver<Arc<CheckpointedBatch>>,
    pub emitted: watch::Receiver<Option<ExitEventId>>,
    pub checkpoints: Q,
    pub source: Arc<dyn ChildChainSource>,
}

impl ExitProofService {
    /// Register every stored checkpoint that is not registered yet, with its events read back
    /// from the child chain. Returns the number of batches registered.
    ///
    /// A batch whose events do not match its checkpoint is logged and skipped. Failing to read
    /// the child chain is an error, nothing after that checkpoint is registered.
    pub async fn resync<Q: CheckpointDatabaseQuery>(
        &self,
        checkpoints: &Q,
        source: &dyn ChildChainSource,
    ) -> anyhow::Result<usize> {
        let mut registered = 0;
        let mut after = 0;
        while let Some(checkpoint) = checkpoints.get_next(after) {
            let range = checkpoint.block_range();
            after = range.end;
            if self.is_registered(range.end) {
                continue;
            }

            let events = source
                .exit_events(range)
                .await
                .with_context(|| format!("failed to read the exit events of {range}"))?;
            match self.register_batch(&CheckpointedBatch { checkpoint, events }) {
                Ok(()) => registered += 1,
                Err(e) => tracing::error!("failed to register resynced batch of {range}: {e}"),
            }
        }

        if registered > 0 {
            tracing::info!(batches = registered, "resynced checkpoint batches");
        }
        Ok(registered)
    }

    async fn catch_up<Q: CheckpointDatabaseQuery>(&self, feed: &ProofFeed<Q>) -> bool {
        match self.resync(&feed.checkpoints, feed.source.as_ref()).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("exit proof resync failed: {e:#}");
                false
            },
        }
    }

    /// Follow the feed until the token is cancelled or the batch channel closes.
    ///
    /// Starts with a resync so checkpoints submitted before the listener existed are served, and
    /// resyncs whenever the batch channel reports lost messages.
    pub fn spawn_listener<Q: CheckpointDatabaseQuery + 'static>(
        self: Arc<Self>,
        mut feed: ProofFeed<Q>,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut retry = interval(RESYNC_RETRY_INTERVAL);
            retry.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut stale = true;
            let mut emitted_open = true;
            if let Some(id) = *feed.emitted.borrow_and_update() {
                self.record_emitted(id);
            }

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    _ = retry.tick(), if stale => stale = !self.catch_up(&feed).await,
                    changed = feed.emitted.changed(), if emitted_open => match changed {
                        Ok(()) => {
                            if let Some(id) = *feed.emitted.borrow_and_update() {
                                self.record_emitted(id);
                            }
                        },
                        Err(_) => emitted_open = false,
                    },
                    batch = feed.batches.recv() => match batch {
                        Ok(batch) => {
                            if let Err(e) = self.register_batch(&batch) {
                                tracing::error!("failed to register checkpoint batch: {e}");
                            }
                        },
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "exit proof listener lagged, resyncing");
                            stale = !self.catch_up(&feed).await;
                        },
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
            tracing::debug!("shutdown exit proof listener");
        })
    }
}
