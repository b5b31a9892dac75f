use std::time::Duration;

use bridge_types::QuorumThreshold;
use serde::{Deserialize, Serialize};

/// The checkpointer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointerConfig {
    /// How often the service tries to checkpoint the next block range.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// How long to wait for validator votes on one commitment before giving up on the batch.
    #[serde(with = "humantime_serde")]
    pub collection_timeout: Duration,

    /// The largest block range a single checkpoint covers.
    pub max_blocks_per_checkpoint: u64,

    pub quorum: QuorumThreshold,
}

impl Default for CheckpointerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            collection_timeout: Duration::from_secs(10),
            max_blocks_per_checkpoint: 100,
            quorum: QuorumThreshold::default(),
        }
    }
}
