use std::collections::BTreeMap;

use async_trait::async_trait;
use bridge_interfaces::ChildChainSource;
use bridge_types::{BlockNumber, BlockRange, Epoch, ExitEvent};
use parking_lot::RwLock;

/// A child chain kept in memory. Blocks are appended with [`InMemoryChildChain::push_block`]
/// and every block is final as soon as it is pushed.
pub struct InMemoryChildChain {
    epoch: Epoch,
    blocks: RwLock<BTreeMap<BlockNumber, Vec<ExitEvent>>>,
}

impl InMemoryChildChain {
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch,
            blocks: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn push_block(&self, block: BlockNumber, events: Vec<ExitEvent>) {
        self.blocks.write().insert(block, events);
    }
}

#[async_trait]
impl ChildChainSource for InMemoryChildChain {
    async fn latest_finalized_block(&self) -> anyhow::Result<BlockNumber> {
        Ok(self
            .blocks
            .read()
            .last_key_value()
            .map(|(block, _)| *block)
            .unwrap_or_default())
    }

    async fn epoch_at(&self, _block: BlockNumber) -> anyhow::Result<Epoch> {
        Ok(self.epoch)
    }

    async fn exit_events(&self, range: BlockRange) -> anyhow::Result<Vec<ExitEvent>> {
        Ok(self
            .blocks
            .read()
            .range(range.start..=range.end)
            .flat_map(|(_, events)| events.iter().cloned())
            .collect())
    }
}
