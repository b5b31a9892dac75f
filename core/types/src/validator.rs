use bit_set::BitSet;
use bridge_crypto::ConsensusPublicKey;
use ethers::abi::{self, Token};
use ethers::types::{Address, H256, U256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};

use crate::Epoch;

/// A validator as registered on the root chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Validator {
    pub address: Address,
    pub voting_power: U256,
    /// The key the validator signs checkpoint commitments with.
    pub bls_key: ConsensusPublicKey,
}

/// The validators of one epoch, in on-chain registration order.
///
/// A set is immutable once built. The index of a validator in the set is its position in the
/// signer bitmap of an aggregated checkpoint signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSet {
    epoch: Epoch,
    validators: Vec<Validator>,
    total_voting_power: U256,
}

impl ValidatorSet {
    pub fn new(epoch: Epoch, validators: Vec<Validator>) -> Self {
        let total_voting_power = validators
            .iter()
            .fold(U256::zero(), |acc, v| acc.saturating_add(v.voting_power));
        Self {
            epoch,
            validators,
            total_voting_power,
        }
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn total_voting_power(&self) -> U256 {
        self.total_voting_power
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Validator> {
        self.validators.get(index)
    }

    pub fn index_of(&self, address: &Address) -> Option<usize> {
        self.validators.iter().position(|v| &v.address == address)
    }

    /// Returns the voting power of the given address, zero if it is not in the set.
    pub fn voting_power_of(&self, address: &Address) -> U256 {
        self.validators
            .iter()
            .find(|v| &v.address == address)
            .map(|v| v.voting_power)
            .unwrap_or_default()
    }

    /// Returns the combined voting power of the validators at the indices in the bitmap, or
    /// `None` if the bitmap references an index outside the set.
    pub fn signers_power(&self, signers: &BitSet) -> Option<U256> {
        signers.iter().try_fold(U256::zero(), |acc, index| {
            self.validators
                .get(index)
                .map(|v| acc.saturating_add(v.voting_power))
        })
    }

    /// Returns the public keys of the validators at the indices in the bitmap, or `None` if
    /// the bitmap references an index outside the set.
    pub fn signer_keys(&self, signers: &BitSet) -> Option<Vec<ConsensusPublicKey>> {
        signers
            .iter()
            .map(|index| self.validators.get(index).map(|v| v.bls_key))
            .collect()
    }

    /// The commitment to this set that checkpoints reference.
    pub fn hash(&self) -> H256 {
        let validators = self
            .validators
            .iter()
            .map(|v| {
                Token::Tuple(vec![
                    Token::Address(v.address),
                    Token::Uint(v.voting_power),
                    Token::Bytes(v.bls_key.0.to_vec()),
                ])
            })
            .collect();
        let encoded = abi::encode(&[Token::Uint(self.epoch.into()), Token::Array(validators)]);
        H256(keccak256(encoded))
    }
}
