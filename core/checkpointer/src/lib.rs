//! Checkpoints commit a range of child chain blocks, and the root of the exit events emitted in
//! it, to the root chain.
//!
//! The [`CheckpointBuilder`] runs on the child chain side. It builds the event tree for a batch,
//! forms the commitment and collects validator votes until the signing power reaches quorum or
//! the collection window closes. The [`CheckpointService`] drives the builder periodically over
//! consecutive block ranges.
//!
//! The [`CheckpointVerifier`] is the root chain's admission check. It verifies the aggregate
//! signature against the validator set of the checkpoint's epoch and appends admitted checkpoints
//! to a [`CheckpointDatabase`], rejecting any range that intersects one already admitted.

mod builder;
mod config;
mod database;
mod error;
mod memory;
mod service;
mod verifier;

#[cfg(test)]
mod tests;

pub use builder::*;
pub use config::*;
pub use database::*;
pub use error::*;
pub use memory::*;
pub use service::*;
pub use verifier::*;
