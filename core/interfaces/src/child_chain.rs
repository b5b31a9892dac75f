use async_trait::async_trait;
use bridge_types::{BlockNumber, BlockRange, Epoch, ExitEvent};

/// Read access to the finalized history of the child chain.
#[async_trait]
pub trait ChildChainSource: Send + Sync {
    /// The highest block that is final and may be checkpointed.
    async fn latest_finalized_block(&self) -> anyhow::Result<BlockNumber>;

    /// The validator set epoch the given block was produced in.
    async fn epoch_at(&self, block: BlockNumber) -> anyhow::Result<Epoch>;

    /// The exit events emitted in the range, ordered by id.
    async fn exit_events(&self, range: BlockRange) -> anyhow::Result<Vec<ExitEvent>>;
}
