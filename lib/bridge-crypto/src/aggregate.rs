use std::borrow::Borrow;
use std::fmt::Display;
use std::str::FromStr;

use arrayref::array_ref;
use fastcrypto::bls12381::min_sig::{
    BLS12381AggregateSignature,
    BLS12381PublicKey,
    BLS12381Signature,
};
use fastcrypto::error::FastCryptoError;
use fastcrypto::traits::{AggregateAuthenticator, ToFromBytes};
use serde::{Deserialize, Serialize};

use crate::{hex_array, BridgeCryptoError, ConsensusPublicKey, ConsensusSignature};

const CONSENSUS_AGGREGATE_SIGNATURE_SIZE: usize = 48;

/// Aggregate BLS signature for the consensus key.
///
/// This is a wrapper around `[fastcrypto::bls12381::min_sig::BLS12381AggregateSignature]` to
/// provide BLS aggregate signature functionality.
#[derive(Hash, PartialEq, PartialOrd, Ord, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct ConsensusAggregateSignature(
    #[serde(with = "hex_array")] pub [u8; CONSENSUS_AGGREGATE_SIGNATURE_SIZE],
);

impl ConsensusAggregateSignature {
    /// Combine signatures into a single aggregated signature.
    pub fn aggregate<'a, K: Borrow<ConsensusSignature> + 'a, I: IntoIterator<Item = &'a K>>(
        signatures: I,
    ) -> Result<Self, BridgeCryptoError> {
        let signatures: Vec<BLS12381Signature> = signatures
            .into_iter()
            .map(|s| s.borrow().try_into())
            .collect::<Result<Vec<_>, _>>()?;
        let agg_sig = BLS12381AggregateSignature::aggregate(&signatures)
            .map_err(|e| BridgeCryptoError::AggregateSignaturesFailure(e.to_string()))?;

        agg_sig.try_into()
    }

    /// Verify this aggregate signature where every signer signed the same message.
    ///
    /// This is the checkpoint case: all validators sign one commitment digest.
    pub fn verify(
        &self,
        pks: &[ConsensusPublicKey],
        msg: &[u8],
    ) -> Result<bool, BridgeCryptoError> {
        let pks = to_bls_keys(pks)?;
        let sig: BLS12381AggregateSignature = (*self).try_into()?;
        match sig.verify(&pks, msg) {
            Ok(()) => Ok(true),
            Err(FastCryptoError::InvalidSignature) => Ok(false),
            Err(e) => Err(BridgeCryptoError::InvalidSignature(e.to_string())),
        }
    }
}

fn to_bls_keys(pks: &[ConsensusPublicKey]) -> Result<Vec<BLS12381PublicKey>, BridgeCryptoError> {
    pks.iter().map(|pk| pk.try_into()).collect()
}

/// Format the signature in hex for display.
impl Display for ConsensusAggregateSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Format the signature in hex for debugging.
impl std::fmt::Debug for ConsensusAggregateSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            r#"ConsensusAggregateSignature("0x{}")"#,
            hex::encode(self.0)
        )
    }
}

/// Parse a signature from a hex string.
impl FromStr for ConsensusAggregateSignature {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex_array::decode(s).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "Signature not in hex format.",
            )
        })?;

        if bytes.len() != CONSENSUS_AGGREGATE_SIGNATURE_SIZE {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "Invalid signature size.",
            ));
        }

        Ok(Self(*array_ref!(
            bytes,
            0,
            CONSENSUS_AGGREGATE_SIGNATURE_SIZE
        )))
    }
}

impl Default for ConsensusAggregateSignature {
    fn default() -> Self {
        Self([0u8; CONSENSUS_AGGREGATE_SIGNATURE_SIZE])
    }
}

impl TryFrom<BLS12381AggregateSignature> for ConsensusAggregateSignature {
    type Error = BridgeCryptoError;

    fn try_from(signature: BLS12381AggregateSignature) -> Result<Self, BridgeCryptoError> {
        Ok(Self(signature.as_bytes().try_into().map_err(
            |e: std::array::TryFromSliceError| BridgeCryptoError::InvalidSignature(e.to_string()),
        )?))
    }
}

impl TryFrom<ConsensusAggregateSignature> for BLS12381AggregateSignature {
    type Error = BridgeCryptoError;

    fn try_from(signature: ConsensusAggregateSignature) -> Result<Self, Self::Error> {
        BLS12381AggregateSignature::from_bytes(&signature.0)
            .map_err(|e| BridgeCryptoError::InvalidAggregateSignature(e.to_string()))
    }
}
