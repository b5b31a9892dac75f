//! The [`ValidatorSetTracker`] keeps the validator set of every epoch of the child chain.
//!
//! Checkpoints are signed by the validator set of the epoch they were produced in, so verifying
//! an old checkpoint needs the set as it was at that epoch. The tracker is append-only: once an
//! epoch is recorded its set never changes and is never removed.

mod error;
mod tracker;


pub use error::*;
pub use tracker::*;
