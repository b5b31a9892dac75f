use std::time::Duration;

use bridge_types::Address;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct RelayerConfig {
    /// Url of the bridge JSON-RPC server that serves exit proofs.
    pub rpc_address: String,
    /// Root chain contract holding checkpoints and the current validator set.
    pub checkpoint_manager: Address,
    /// Root chain contract that processes exit claims.
    pub exit_helper: Address,
    /// How long to wait for a submitted exit to be reported as processed.
    #[serde(with = "humantime_serde")]
    pub confirm_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub confirm_interval: Duration,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            rpc_address: "http://127.0.0.1:4069".to_string(),
            checkpoint_manager: Address::zero(),
            exit_helper: Address::zero(),
            confirm_timeout: Duration::from_secs(30),
            confirm_interval: Duration::from_secs(1),
        }
    }
}
