mod checkpointer;
mod codec;
mod event;
mod proof;
mod quorum;
mod validator;

pub use checkpointer::*;
pub use codec::*;
pub use ethers::types::{Address, Bytes, H256, U256};
pub use event::*;
pub use proof::*;
pub use quorum::*;
pub use validator::*;

/// A validator set epoch on the child chain.
pub type Epoch = u64;

/// A child chain block number.
pub type BlockNumber = u64;

/// The sequence number of an exit event. Strictly increasing and gap-free over the lifetime of
/// the child chain.
pub type ExitEventId = u64;
