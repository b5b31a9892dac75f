use std::sync::Arc;

use anyhow::{Context, Result};
use bridge_interfaces::{CheckpointSink, ChildChainSource, ConfigConsumer};
use bridge_types::{BlockNumber, BlockRange, CheckpointedBatch, ExitEventId};
use bridge_validator_tracker::ValidatorSetTracker;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{CheckpointBuilder, CheckpointError, CheckpointerConfig};

/// Capacity of the channel announcing submitted batches.
const BATCH_CHANNEL_CAPACITY: usize = 64;

/// The periodic checkpoint task.
///
/// On every tick it takes the next block range after the last submitted checkpoint, up to the
/// latest finalized block, builds a checkpoint for it and submits it to the sink. A batch that
/// fails to reach quorum is dropped and the same range is tried again on the next tick.
pub struct CheckpointService {
    config: CheckpointerConfig,
    source: Arc<dyn ChildChainSource>,
    builder: CheckpointBuilder,
    sink: Arc<dyn CheckpointSink>,
    tracker: Arc<ValidatorSetTracker>,
    batches: broadcast::Sender<Arc<CheckpointedBatch>>,
    /// The highest exit id read from the child chain, checkpointed or not.
    emitted: watch::Sender<Option<ExitEventId>>,
    next_block: BlockNumber,
    next_exit_id: Option<ExitEventId>,
}

impl CheckpointService {
    pub fn new(
        config: CheckpointerConfig,
        source: Arc<dyn ChildChainSource>,
        builder: CheckpointBuilder,
        sink: Arc<dyn CheckpointSink>,
        tracker: Arc<ValidatorSetTracker>,
    ) -> Self {
        let (batches, _) = broadcast::channel(BATCH_CHANNEL_CAPACITY);
        let (emitted, _) = watch::channel(None);
        Self {
            config,
            source,
            builder,
            sink,
            tracker,
            batches,
            emitted,
            next_block: 1,
            next_exit_id: None,
        }
    }

    /// Resume after a previously submitted checkpoint: the next range starts at `next_block`
    /// and its first exit event, if any, must have id `next_exit_id`.
    pub fn resume_from(mut self, next_block: BlockNumber, next_exit_id: ExitEventId) -> Self {
        self.next_block = next_block;
        self.next_exit_id = Some(next_exit_id);
        self
    }

    /// Subscribe to the batches of submitted checkpoints.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<CheckpointedBatch>> {
        self.batches.subscribe()
    }

    /// Watch the highest exit id seen on the child chain. It is updated as soon as the events
    /// of a range are read, before the range has a checkpoint.
    pub fn watch_emitted(&self) -> watch::Receiver<Option<ExitEventId>> {
        self.emitted.subscribe()
    }

    pub fn next_block(&self) -> BlockNumber {
        self.next_block
    }

    /// Spawn the service on the runtime. It runs until the token is cancelled.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.start(shutdown).await })
    }

    pub async fn start(mut self, shutdown: CancellationToken) {
        tracing::debug!("starting checkpoint service");

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    // Cancelling mid-tick drops the in-flight batch before any state is updated.
                    let result = tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => break,
                        result = self.tick() => result,
                    };
                    if let Err(e) = result {
                        tracing::warn!("checkpoint attempt failed: {e:#}");
                    }
                }
            }
        }

        tracing::debug!("shutdown checkpoint service");
    }

    /// Try to checkpoint the next block range. Returns the submitted range, or `None` if there
    /// was nothing to checkpoint or quorum was not reached.
    pub async fn tick(&mut self) -> Result<Option<BlockRange>> {
        let latest = self
            .source
            .latest_finalized_block()
            .await
            .context("failed to get the latest finalized block")?;
        if latest < self.next_block {
            return Ok(None);
        }

        let max_blocks = self.config.max_blocks_per_checkpoint.max(1);
        let end = latest.min(self.next_block.saturating_add(max_blocks - 1));
        let range = BlockRange::new(self.next_block, end);

        let epoch = self
            .source
            .epoch_at(end)
            .await
            .with_context(|| format!("failed to get the epoch of block {end}"))?;
        let events = self
            .source
            .exit_events(range)
            .await
            .with_context(|| format!("failed to get the exit events of {range}"))?;

        if let Some(last) = events.last() {
            self.emitted.send_if_modified(|emitted| {
                let advanced = emitted.map_or(true, |id| id < last.id);
                if advanced {
                    *emitted = Some(last.id);
                }
                advanced
            });
        }

        if let (Some(expected), Some(first)) = (self.next_exit_id, events.first()) {
            if first.id != expected {
                return Err(CheckpointError::NonSequentialExitEvents {
                    range,
                    expected,
                    found: first.id,
                }
                .into());
            }
        }

        let checkpoint = match self.builder.build(epoch, range, &events).await {
            Ok(checkpoint) => checkpoint,
            Err(e @ CheckpointError::QuorumNotReached { .. }) => {
                tracing::warn!("{e}, retrying on the next interval");
                return Ok(None);
            },
            Err(e) => return Err(e.into()),
        };

        let validators = self.tracker.get(epoch)?;
        self.sink
            .submit_checkpoint(&checkpoint, &validators)
            .await
            .with_context(|| format!("failed to submit the checkpoint for {range}"))?;

        self.next_block = end.saturating_add(1);
        if let Some(last) = events.last() {
            self.next_exit_id = Some(last.id.saturating_add(1));
        }

        // No subscribers is fine, nobody needs the batch then.
        let _ = self
            .batches
            .send(Arc::new(CheckpointedBatch { checkpoint, events }));

        Ok(Some(range))
    }
}

/// The checkpointer has a configuration within the bridge configuration, which is declared by
/// this implementation.
impl ConfigConsumer for CheckpointService {
    const KEY: &'static str = "checkpointer";

    type Config = CheckpointerConfig;
}
