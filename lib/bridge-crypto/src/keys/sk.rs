use arrayref::array_ref;
use fastcrypto::bls12381::min_sig::{BLS12381KeyPair, BLS12381PrivateKey, BLS12381PublicKey};
use fastcrypto::traits::{KeyPair, Signer, ToFromBytes};
use rand::rngs::{StdRng, ThreadRng};
use rand::SeedableRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::keys::pk::{ConsensusPublicKey, ConsensusSignature};
use crate::{BridgeCryptoError, SecretKey};

const CONSENSUS_SECRET_KEY_SIZE: usize = 32;

/// A validator's BLS12-381 secret key, used to sign checkpoint commitments.
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct ConsensusSecretKey([u8; CONSENSUS_SECRET_KEY_SIZE]);

impl ConsensusSecretKey {
    /// Deterministically derive a secret key from a seed. Only meant for tests and local
    /// devnets, where reproducible validator keys are needed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let pair = BLS12381KeyPair::generate(&mut StdRng::from_seed(seed));
        pair.private().into()
    }

    /// Load a secret key from its raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BridgeCryptoError> {
        let secret = BLS12381PrivateKey::from_bytes(bytes)
            .map_err(|e| BridgeCryptoError::InvalidSecretKey(e.to_string()))?;
        Ok(secret.into())
    }
}

impl std::fmt::Debug for ConsensusSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ConsensusSecretKeyOf")
            .field(&self.to_pk())
            .finish()
    }
}

impl From<BLS12381PrivateKey> for ConsensusSecretKey {
    fn from(value: BLS12381PrivateKey) -> Self {
        let bytes = value.as_ref();
        ConsensusSecretKey(*array_ref!(bytes, 0, CONSENSUS_SECRET_KEY_SIZE))
    }
}

impl From<&ConsensusSecretKey> for BLS12381PrivateKey {
    fn from(value: &ConsensusSecretKey) -> Self {
        // The bytes always come from a valid private key, see the constructors above.
        BLS12381PrivateKey::from_bytes(&value.0).expect("consensus secret key bytes are valid")
    }
}

impl SecretKey for ConsensusSecretKey {
    type PublicKey = ConsensusPublicKey;

    fn generate() -> Self {
        let pair = BLS12381KeyPair::generate(&mut ThreadRng::default());
        pair.private().into()
    }

    fn sign(&self, msg: &[u8]) -> ConsensusSignature {
        let secret: BLS12381PrivateKey = self.into();
        let pair: BLS12381KeyPair = secret.into();
        pair.sign(msg).into()
    }

    fn to_pk(&self) -> ConsensusPublicKey {
        let secret: &BLS12381PrivateKey = &self.into();
        let pubkey: BLS12381PublicKey = secret.into();
        pubkey.into()
    }
}
