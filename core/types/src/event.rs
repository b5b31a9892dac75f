//! Cross-chain event payloads.

use ethers::types::{Address, Bytes, H256};
use exit_tree::hashers::keccak::KeccakHasher;
use exit_tree::{MerkleTree, SimpleHasher};
use serde::{Deserialize, Serialize};

use crate::{EventCodec, ExitEventId, ExitProof};

/// A message emitted on the child chain that must take effect on the root chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExitEvent {
    pub id: ExitEventId,
    pub sender: Address,
    pub receiver: Address,
    pub data: Bytes,
}

impl ExitEvent {
    /// The merkle leaf of this event: the hash of its canonical encoding.
    pub fn leaf_hash(&self) -> H256 {
        H256(KeccakHasher::hash(&self.encode()))
    }

    /// Check that this event is included under the given event root.
    ///
    /// This is a pure predicate. Untrusted proofs are expected, so a mismatch is not an error.
    pub fn verify_inclusion(&self, event_root: &H256, proof: &ExitProof) -> bool {
        proof
            .to_merkle_proof()
            .verify_leaf_hash::<KeccakHasher>(&event_root.0, self.leaf_hash().0)
    }
}

/// A deposit message emitted on the root chain and synced to the child chain. It shares the
/// canonical encoding of [`ExitEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateSyncEvent {
    pub id: u64,
    pub sender: Address,
    pub receiver: Address,
    pub data: Bytes,
}

/// The outcome of processing an exit on the root chain, as reported by the result log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitResult {
    pub id: ExitEventId,
    pub success: bool,
}

/// Build the merkle tree over the exit events of one checkpoint batch, in batch order.
pub fn build_exit_tree(events: &[ExitEvent]) -> MerkleTree<KeccakHasher> {
    MerkleTree::from_leaf_hashes(events.iter().map(|event| event.leaf_hash().0).collect())
}

/// Returns true if the ids are strictly increasing with no gaps.
pub fn is_sequential(events: &[ExitEvent]) -> bool {
    events
        .windows(2)
        .all(|pair| pair[0].id.checked_add(1) == Some(pair[1].id))
}
