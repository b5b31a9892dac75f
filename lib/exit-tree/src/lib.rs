//! An ordered, append-free binary merkle tree used to commit to the exit events of a checkpoint
//! batch, along with inclusion proofs for individual leaves.
//!
//! Leaves are the hash of the leaf data, internal nodes are `hash(left || right)`, and an odd node
//! at any level is paired with itself. The same rule is applied when generating and verifying
//! proofs, so a proof produced by [`MerkleTree::prove`] always verifies against
//! [`MerkleTree::root`].

mod errors;
mod hasher;
pub mod hashers;
mod proof;
mod tree;

pub use errors::MerkleTreeError;
pub use hasher::{MerkleHash, SimpleHasher, ZERO_HASH};
pub use proof::MerkleProof;
pub use tree::MerkleTree;
