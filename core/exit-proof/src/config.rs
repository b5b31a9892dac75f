use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitProofConfig {
    /// How many batch trees to keep built. Evicted trees are rebuilt from the batch events.
    pub tree_cache_size: usize,
}

impl Default for ExitProofConfig {
    fn default() -> Self {
        Self {
            tree_cache_size: 128,
        }
    }
}
