use std::fmt::Display;
use std::str::FromStr;

use arrayref::array_ref;
use derive_more::{AsRef, From};
use fastcrypto::bls12381::min_sig::{BLS12381PublicKey, BLS12381Signature};
use fastcrypto::error::FastCryptoError;
use fastcrypto::traits::{ToFromBytes, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::{hex_array, BridgeCryptoError, PublicKey};

pub(crate) const CONSENSUS_PUBLIC_KEY_SIZE: usize = 96;
pub(crate) const CONSENSUS_SIGNATURE_SIZE: usize = 48;

/// A validator's BLS12-381 (min-sig) public key.
#[derive(From, AsRef, Hash, PartialEq, PartialOrd, Ord, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct ConsensusPublicKey(#[serde(with = "hex_array")] pub [u8; CONSENSUS_PUBLIC_KEY_SIZE]);

/// A single validator's BLS12-381 signature.
#[derive(From, AsRef, Hash, PartialEq, PartialOrd, Ord, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct ConsensusSignature(#[serde(with = "hex_array")] pub [u8; CONSENSUS_SIGNATURE_SIZE]);

impl PublicKey for ConsensusPublicKey {
    type Signature = ConsensusSignature;

    fn verify(&self, signature: &Self::Signature, msg: &[u8]) -> Result<bool, BridgeCryptoError> {
        let pubkey: BLS12381PublicKey = self.try_into()?;
        let signature: BLS12381Signature = signature.try_into()?;
        match pubkey.verify(msg, &signature) {
            Ok(()) => Ok(true),
            Err(FastCryptoError::InvalidSignature) => Ok(false),
            Err(e) => Err(BridgeCryptoError::InvalidSignature(e.to_string())),
        }
    }
}

// <-- start of string and display implementation.

impl Display for ConsensusPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for ConsensusPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, r#"ConsensusPublicKey("0x{}")"#, hex::encode(self.0))
    }
}

impl FromStr for ConsensusPublicKey {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex_array::decode(s).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "Public key not in hex format.",
            )
        })?;

        if bytes.len() != CONSENSUS_PUBLIC_KEY_SIZE {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "Invalid public key size.",
            ));
        }

        Ok(Self(*array_ref!(bytes, 0, CONSENSUS_PUBLIC_KEY_SIZE)))
    }
}

impl Display for ConsensusSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for ConsensusSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, r#"ConsensusSignature("0x{}")"#, hex::encode(self.0))
    }
}

impl FromStr for ConsensusSignature {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex_array::decode(s).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "Signature not in hex format.",
            )
        })?;

        if bytes.len() != CONSENSUS_SIGNATURE_SIZE {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "Invalid signature size.",
            ));
        }

        Ok(Self(*array_ref!(bytes, 0, CONSENSUS_SIGNATURE_SIZE)))
    }
}

impl Default for ConsensusSignature {
    fn default() -> Self {
        Self([0u8; CONSENSUS_SIGNATURE_SIZE])
    }
}

// end of string and display implementation. -->

// <-- start of fastcrypto conversions.

impl From<BLS12381PublicKey> for ConsensusPublicKey {
    fn from(value: BLS12381PublicKey) -> Self {
        let bytes = value.as_ref();
        Self(*array_ref!(bytes, 0, CONSENSUS_PUBLIC_KEY_SIZE))
    }
}

impl TryFrom<&ConsensusPublicKey> for BLS12381PublicKey {
    type Error = BridgeCryptoError;

    fn try_from(value: &ConsensusPublicKey) -> Result<Self, Self::Error> {
        BLS12381PublicKey::from_bytes(&value.0)
            .map_err(|e| BridgeCryptoError::InvalidPublicKey(e.to_string()))
    }
}

impl From<BLS12381Signature> for ConsensusSignature {
    fn from(value: BLS12381Signature) -> Self {
        let bytes = value.as_ref();
        Self(*array_ref!(bytes, 0, CONSENSUS_SIGNATURE_SIZE))
    }
}

impl TryFrom<&ConsensusSignature> for BLS12381Signature {
    type Error = BridgeCryptoError;

    fn try_from(value: &ConsensusSignature) -> Result<Self, Self::Error> {
        BLS12381Signature::from_bytes(&value.0)
            .map_err(|e| BridgeCryptoError::InvalidSignature(e.to_string()))
    }
}

// end of fastcrypto conversions -->
