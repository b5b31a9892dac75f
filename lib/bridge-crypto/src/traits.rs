use zeroize::ZeroizeOnDrop;

use crate::BridgeCryptoError;

pub trait PublicKey: Sized {
    /// The signature associated with this public key.
    type Signature;

    /// Verify a signature against this public key.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not verify, and an error if
    /// either the key or the signature bytes are not valid curve points.
    fn verify(&self, signature: &Self::Signature, msg: &[u8]) -> Result<bool, BridgeCryptoError>;
}

pub trait SecretKey: Sized + ZeroizeOnDrop {
    type PublicKey: PublicKey;

    /// Generate a random secret key using a secure source of randomness.
    fn generate() -> Self;

    /// Sign a raw message.
    fn sign(&self, msg: &[u8]) -> <Self::PublicKey as PublicKey>::Signature;

    /// Returns the public key associated with this secret key.
    fn to_pk(&self) -> Self::PublicKey;
}
