use bridge_types::{Address, Epoch};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidatorSetError {
    #[error("Validator set for epoch {0} is already recorded")]
    DuplicateEpoch(Epoch),

    #[error("Validator set for epoch {0} is empty")]
    EmptyValidatorSet(Epoch),

    #[error("Validator {address:?} appears more than once in epoch {epoch}")]
    DuplicateValidator { epoch: Epoch, address: Address },

    #[error("Unknown epoch {0}")]
    UnknownEpoch(Epoch),
}

impl ValidatorSetError {
    /// Lookups of an epoch that is not recorded yet may succeed once it is.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::UnknownEpoch(_))
    }
}
