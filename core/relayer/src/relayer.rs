use std::sync::Arc;

use bridge_interfaces::{ConfigConsumer, RootChainCaller};
use bridge_rpc::{rpc_client, BridgeApiClient};
use bridge_types::{ExitEventId, ExitProofResponse, ExitResult};
use bridge_utils::hex::format_exit_id;
use bridge_utils::poll::{poll_until, PollUntilError};
use ethers::types::U64;
use jsonrpsee::core::client::Error as ClientError;
use jsonrpsee::http_client::HttpClient;

use crate::{RelayerConfig, RelayerError, RootChainContracts};

/// Carries exits from the child chain to the root chain.
///
/// For every exit id the relayer fetches the inclusion proof from the bridge JSON-RPC server,
/// submits the claim to the exit helper and waits until the root chain reports the exit as
/// processed.
pub struct ExitRelayer {
    config: RelayerConfig,
    client: HttpClient,
    contracts: RootChainContracts,
}

impl ExitRelayer {
    pub fn new(config: RelayerConfig, caller: Arc<dyn RootChainCaller>) -> anyhow::Result<Self> {
        let client = rpc_client(&config.rpc_address)?;
        let contracts =
            RootChainContracts::new(caller, config.checkpoint_manager, config.exit_helper);
        Ok(Self {
            config,
            client,
            contracts,
        })
    }

    pub fn contracts(&self) -> &RootChainContracts {
        &self.contracts
    }

    pub async fn fetch_proof(&self, id: ExitEventId) -> Result<ExitProofResponse, RelayerError> {
        self.client
            .generate_exit_proof(format_exit_id(id))
            .await
            .map_err(|e| match e {
                ClientError::Call(err) => RelayerError::ProofUnavailable {
                    exit_id: id,
                    code: err.code(),
                    message: err.message().to_string(),
                },
                e => RelayerError::ProofTransport {
                    exit_id: id,
                    reason: e.to_string(),
                },
            })
    }

    /// Relay one exit.
    ///
    /// Returns [`RelayerError::AlreadyProcessed`] without submitting anything if the root chain
    /// already honored the exit, and [`RelayerError::ExitFailed`] if the exit was processed but
    /// its call to the receiver failed.
    pub async fn relay_exit(&self, id: ExitEventId) -> Result<ExitResult, RelayerError> {
        let response = self.fetch_proof(id).await?;
        let checkpoint_block = response.metadata.checkpoint_block;

        if self.contracts.is_processed(id).await? {
            tracing::debug!(exit_id = id, "exit already processed on the root chain");
            return Err(RelayerError::AlreadyProcessed(id));
        }

        let receipt = self
            .contracts
            .exit(checkpoint_block, &response.metadata.exit_event, &response.proof())
            .await?;
        let tx_hash = receipt.transaction_hash;
        if receipt.status == Some(U64::zero()) {
            tracing::warn!(exit_id = id, checkpoint_block, ?tx_hash, "exit reverted");
            return Err(RelayerError::Reverted {
                exit_id: id,
                checkpoint_block,
                tx_hash,
            });
        }

        let result = self
            .contracts
            .exit_results(&receipt)?
            .into_iter()
            .find(|result| result.id == id)
            .ok_or(RelayerError::MissingExitResult {
                exit_id: id,
                tx_hash,
            })?;
        if !result.success {
            tracing::warn!(exit_id = id, ?tx_hash, "exit processed but its call failed");
            return Err(RelayerError::ExitFailed {
                exit_id: id,
                tx_hash,
            });
        }

        self.confirm_processed(id).await?;
        tracing::info!(exit_id = id, checkpoint_block, ?tx_hash, "relayed exit");
        Ok(result)
    }

    /// Relay the given exits in order. A failure does not stop the exits after it.
    pub async fn relay_exits(
        &self,
        ids: impl IntoIterator<Item = ExitEventId>,
    ) -> Vec<(ExitEventId, Result<ExitResult, RelayerError>)> {
        let mut outcomes = Vec::new();
        for id in ids {
            let outcome = self.relay_exit(id).await;
            if let Err(e) = &outcome {
                if !e.is_benign() {
                    tracing::error!(exit_id = id, "failed to relay exit: {e}");
                }
            }
            outcomes.push((id, outcome));
        }
        outcomes
    }

    async fn confirm_processed(&self, id: ExitEventId) -> Result<(), RelayerError> {
        let confirmed = poll_until(
            || async {
                match self.contracts.is_processed(id).await {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(PollUntilError::ConditionNotSatisfied),
                    Err(e) => Err(PollUntilError::ConditionError(e.to_string())),
                }
            },
            self.config.confirm_timeout,
            self.config.confirm_interval,
        )
        .await;

        confirmed.map_err(|e| {
            tracing::warn!(exit_id = id, "exit not confirmed: {e}");
            RelayerError::NotConfirmed(id)
        })
    }
}

impl ConfigConsumer for ExitRelayer {
    const KEY: &'static str = "relayer";

    type Config = RelayerConfig;
}
