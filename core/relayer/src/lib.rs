//! The root chain side of the bridge as seen from a relayer: contract bindings, the exit
//! relayer and a validator set consistency check.

mod config;
mod contracts;
mod error;
mod relayer;
mod syncer;


pub use config::*;
pub use contracts::{decode_exit_submitted, RootChainContracts, MAX_VALIDATOR_SET_LENGTH};
pub use error::*;
pub use relayer::*;
pub use syncer::*;
