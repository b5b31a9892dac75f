//! BLS12-381 consensus keys used by validators to sign checkpoint commitments, and the aggregate
//! signature that the root chain verifies on admission.

mod aggregate;
mod errors;
pub(crate) mod hex_array;
mod keys;
mod traits;

pub use aggregate::*;
pub use errors::BridgeCryptoError;
pub use keys::*;
pub use traits::*;
