use std::fmt;
use std::sync::Arc;

use bridge_types::{Address, Epoch, U256};
use bridge_validator_tracker::ValidatorSetTracker;

use crate::{RelayerError, RootChainContracts};

/// A difference between the root chain's current validator set and a tracked one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorSetMismatch {
    Length {
        root_chain: usize,
        tracked: usize,
    },
    Validator {
        index: usize,
        root_chain: (Address, U256),
        tracked: (Address, U256),
    },
}

impl fmt::Display for ValidatorSetMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length {
                root_chain,
                tracked,
            } => write!(f, "{root_chain} validators on the root chain, {tracked} tracked"),
            Self::Validator {
                index,
                root_chain,
                tracked,
            } => write!(
                f,
                "validator {index} is {:?} with power {} on the root chain, {:?} with power {} \
                 tracked",
                root_chain.0, root_chain.1, tracked.0, tracked.1
            ),
        }
    }
}

/// Checks that the root chain agrees with the tracker on who the validators are.
pub struct ValidatorSetSyncer {
    contracts: RootChainContracts,
    tracker: Arc<ValidatorSetTracker>,
}

impl ValidatorSetSyncer {
    pub fn new(contracts: RootChainContracts, tracker: Arc<ValidatorSetTracker>) -> Self {
        Self { contracts, tracker }
    }

    /// Compare the root chain's current set with the tracked set of `epoch`, member by member
    /// in order. An empty result means they agree.
    pub async fn diff(&self, epoch: Epoch) -> Result<Vec<ValidatorSetMismatch>, RelayerError> {
        let tracked = self.tracker.get(epoch)?;
        let root_chain = self.contracts.current_validator_set().await?;

        let mut mismatches = Vec::new();
        if root_chain.len() != tracked.len() {
            mismatches.push(ValidatorSetMismatch::Length {
                root_chain: root_chain.len(),
                tracked: tracked.len(),
            });
        }
        for (index, (remote, local)) in root_chain.iter().zip(tracked.validators()).enumerate() {
            let local = (local.address, local.voting_power);
            if *remote != local {
                mismatches.push(ValidatorSetMismatch::Validator {
                    index,
                    root_chain: *remote,
                    tracked: local,
                });
            }
        }

        for mismatch in &mismatches {
            tracing::warn!(epoch, "validator set out of sync: {mismatch}");
        }
        Ok(mismatches)
    }

    /// Like [`Self::diff`], but any difference is an error.
    pub async fn ensure_in_sync(&self, epoch: Epoch) -> Result<(), RelayerError> {
        let mismatches = self.diff(epoch).await?;
        if mismatches.is_empty() {
            tracing::debug!(epoch, "validator set in sync with the root chain");
            return Ok(());
        }
        Err(RelayerError::ValidatorSetOutOfSync {
            epoch,
            mismatches: mismatches.len(),
        })
    }
}
