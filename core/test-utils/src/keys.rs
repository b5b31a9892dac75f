use bit_set::BitSet;
use bridge_crypto::{
    ConsensusAggregateSignature,
    ConsensusSecretKey,
    ConsensusSignature,
    SecretKey,
};
use bridge_interfaces::CheckpointVote;
use bridge_types::{
    Address,
    AggregatedSignature,
    CheckpointCommitment,
    Validator,
    ValidatorSet,
    U256,
};

/// A validator whose secret key is known, derived deterministically from a one byte seed.
#[derive(Clone)]
pub struct TestValidator {
    pub address: Address,
    pub secret_key: ConsensusSecretKey,
    pub voting_power: U256,
}

impl TestValidator {
    pub fn new(seed: u8, voting_power: u64) -> Self {
        Self {
            address: Address::repeat_byte(seed),
            secret_key: ConsensusSecretKey::from_seed([seed; 32]),
            voting_power: voting_power.into(),
        }
    }

    pub fn validator(&self) -> Validator {
        Validator {
            address: self.address,
            voting_power: self.voting_power,
            bls_key: self.secret_key.to_pk(),
        }
    }

    pub fn sign(&self, commitment: &CheckpointCommitment) -> ConsensusSignature {
        self.secret_key.sign(&commitment.digest())
    }

    pub fn vote(&self, commitment: &CheckpointCommitment) -> CheckpointVote {
        CheckpointVote {
            validator: self.address,
            signature: self.sign(commitment),
        }
    }
}

/// Build test validators with the given voting powers. Seeds start at 1.
pub fn test_validators(powers: &[u64]) -> Vec<TestValidator> {
    powers
        .iter()
        .enumerate()
        .map(|(i, power)| TestValidator::new(i as u8 + 1, *power))
        .collect()
}

pub fn to_validators(validators: &[TestValidator]) -> Vec<Validator> {
    validators.iter().map(TestValidator::validator).collect()
}

/// Aggregate the signatures of `signers` over the commitment, with the bitmap built from their
/// positions in `set`. Signers that are not in the set are skipped.
pub fn sign_commitment(
    commitment: &CheckpointCommitment,
    set: &ValidatorSet,
    signers: &[&TestValidator],
) -> AggregatedSignature {
    let mut bitmap = BitSet::new();
    let mut signatures = Vec::new();
    for signer in signers {
        if let Some(index) = set.index_of(&signer.address) {
            bitmap.insert(index);
            signatures.push(signer.sign(commitment));
        }
    }
    AggregatedSignature {
        signature: ConsensusAggregateSignature::aggregate(signatures.iter())
            .unwrap_or_default(),
        signers: bitmap,
    }
}
