use std::collections::HashSet;
use std::sync::Arc;

use bridge_types::{Address, Epoch, Validator, ValidatorSet, U256};
use parking_lot::RwLock;

use crate::ValidatorSetError;

/// Append-only map from epoch to the validator set of that epoch.
///
/// Writes are serialized per epoch by the underlying concurrent map, reads of one epoch never
/// wait on a write to another.
#[derive(Default)]
pub struct ValidatorSetTracker {
    sets: scc::HashMap<Epoch, Arc<ValidatorSet>>,
    latest: RwLock<Option<Epoch>>,
}

impl ValidatorSetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the validator set of a new epoch.
    pub fn record_epoch(
        &self,
        epoch: Epoch,
        validators: Vec<Validator>,
    ) -> Result<Arc<ValidatorSet>, ValidatorSetError> {
        if validators.is_empty() {
            return Err(ValidatorSetError::EmptyValidatorSet(epoch));
        }

        let mut seen = HashSet::with_capacity(validators.len());
        if let Some(v) = validators.iter().find(|v| !seen.insert(v.address)) {
            return Err(ValidatorSetError::DuplicateValidator {
                epoch,
                address: v.address,
            });
        }

        let set = Arc::new(ValidatorSet::new(epoch, validators));
        self.sets
            .insert(epoch, set.clone())
            .map_err(|_| ValidatorSetError::DuplicateEpoch(epoch))?;
        {
            let mut latest = self.latest.write();
            if latest.map_or(true, |current| current < epoch) {
                *latest = Some(epoch);
            }
        }

        tracing::info!(
            epoch,
            validators = set.len(),
            total_voting_power = %set.total_voting_power(),
            "recorded validator set"
        );

        Ok(set)
    }

    /// Returns the validator set of the given epoch.
    pub fn get(&self, epoch: Epoch) -> Result<Arc<ValidatorSet>, ValidatorSetError> {
        self.sets
            .read(&epoch, |_, set| set.clone())
            .ok_or(ValidatorSetError::UnknownEpoch(epoch))
    }

    pub fn contains(&self, epoch: Epoch) -> bool {
        self.sets.contains(&epoch)
    }

    /// Returns the voting power of the address in the given epoch. An address that is not a
    /// validator, or an epoch that is not recorded, has no voting power.
    pub fn voting_power_of(&self, epoch: Epoch, address: &Address) -> U256 {
        self.sets
            .read(&epoch, |_, set| set.voting_power_of(address))
            .unwrap_or_default()
    }

    /// Returns the highest recorded epoch.
    pub fn latest_epoch(&self) -> Option<Epoch> {
        *self.latest.read()
    }

    /// Returns the validator set of the highest recorded epoch.
    pub fn latest(&self) -> Option<Arc<ValidatorSet>> {
        self.latest_epoch().and_then(|epoch| self.get(epoch).ok())
    }

    /// The number of recorded epochs.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
