use serde::{Deserialize, Serialize};

use crate::{MerkleHash, SimpleHasher};

/// An inclusion proof for a single leaf: its position in the tree and the sibling hashes from the
/// leaf level up to (but excluding) the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub leaf_index: u64,
    pub sibling_path: Vec<MerkleHash>,
}

impl MerkleProof {
    /// Recompute the root from the given leaf hash by walking up the sibling path.
    ///
    /// Returns `None` if the leaf index addresses a position beyond what the path length can
    /// represent, since such a proof cannot come from a tree of that depth.
    ///
    /// The proof does not carry the leaf count, so the index is not unique for a padded leaf.
    /// When the last leaf of an odd level is paired with itself, the padding position right
    /// after it verifies with the same path: leaf `c` of `[a, b, c]` verifies at index 2 and 3.
    /// Callers that need one claim per leaf must key on the leaf content, not the index.
    pub fn compute_root<H: SimpleHasher>(&self, leaf_hash: MerkleHash) -> Option<MerkleHash> {
        if self.sibling_path.len() < u64::BITS as usize
            && self.leaf_index >> self.sibling_path.len() != 0
        {
            return None;
        }

        let mut position = self.leaf_index;
        let mut node = leaf_hash;
        for sibling in &self.sibling_path {
            node = if position & 1 == 0 {
                H::hash_pair(&node, sibling)
            } else {
                H::hash_pair(sibling, &node)
            };
            position >>= 1;
        }

        Some(node)
    }

    /// Verify that the given leaf hash is included in the tree with the given root.
    pub fn verify_leaf_hash<H: SimpleHasher>(
        &self,
        root: &MerkleHash,
        leaf_hash: MerkleHash,
    ) -> bool {
        self.compute_root::<H>(leaf_hash)
            .is_some_and(|computed| &computed == root)
    }

    /// Verify that the given raw leaf data is included in the tree with the given root.
    pub fn verify<H: SimpleHasher>(&self, root: &MerkleHash, leaf: &[u8]) -> bool {
        self.verify_leaf_hash::<H>(root, H::hash(leaf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashers::keccak::KeccakHasher;
    use crate::MerkleTree;

    #[test]
    fn test_verify_rejects_index_beyond_depth() {
        let tree = MerkleTree::<KeccakHasher>::build([b"a", b"b", b"c", b"d"]);
        let mut proof = tree.prove(1).unwrap();
        assert!(proof.verify::<KeccakHasher>(&tree.root(), b"b"));

        // Index 5 has the same low bits as index 1, but cannot exist in a depth 2 tree.
        proof.leaf_index = 5;
        assert!(!proof.verify::<KeccakHasher>(&tree.root(), b"b"));
    }

    #[test]
    fn test_verify_rejects_wrong_position() {
        let tree = MerkleTree::<KeccakHasher>::build([b"a", b"b", b"c", b"d"]);
        let mut proof = tree.prove(1).unwrap();
        proof.leaf_index = 0;
        assert!(!proof.verify::<KeccakHasher>(&tree.root(), b"b"));
    }

    #[test]
    fn test_padded_leaf_also_verifies_at_padding_index() {
        let tree = MerkleTree::<KeccakHasher>::build([b"a", b"b", b"c"]);
        let mut proof = tree.prove(2).unwrap();
        assert!(proof.verify::<KeccakHasher>(&tree.root(), b"c"));

        proof.leaf_index = 3;
        assert!(proof.verify::<KeccakHasher>(&tree.root(), b"c"));

        // Only the padded position aliases, the leaves before it keep a single index.
        let mut proof = tree.prove(1).unwrap();
        proof.leaf_index = 3;
        assert!(!proof.verify::<KeccakHasher>(&tree.root(), b"b"));

        let even = MerkleTree::<KeccakHasher>::build([b"a", b"b", b"c", b"d"]);
        let mut proof = even.prove(3).unwrap();
        proof.leaf_index = 2;
        assert!(!proof.verify::<KeccakHasher>(&even.root(), b"d"));
    }

    #[test]
    fn test_verify_rejects_truncated_path() {
        let tree = MerkleTree::<KeccakHasher>::build([b"a", b"b", b"c", b"d"]);
        let mut proof = tree.prove(2).unwrap();
        proof.sibling_path.pop();
        assert!(!proof.verify::<KeccakHasher>(&tree.root(), b"c"));
    }
}
