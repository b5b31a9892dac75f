mod pk;
mod sk;

pub use pk::{ConsensusPublicKey, ConsensusSignature};
pub use sk::ConsensusSecretKey;
