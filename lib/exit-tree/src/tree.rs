use std::marker::PhantomData;

use tracing::trace_span;

use crate::hashers::keccak::KeccakHasher;
use crate::{MerkleHash, MerkleProof, MerkleTreeError, SimpleHasher, ZERO_HASH};

/// An ordered binary merkle tree over a fixed list of leaves.
///
/// All levels are kept in memory, from the leaf hashes at level 0 up to the single root node, so
/// proofs can be read off without rehashing.
pub struct MerkleTree<H: SimpleHasher = KeccakHasher> {
    levels: Vec<Vec<MerkleHash>>,
    _hasher: PhantomData<H>,
}

impl<H: SimpleHasher> MerkleTree<H> {
    /// Build a tree from the raw leaf data, hashing each leaf first.
    pub fn build<I, T>(leaves: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self::from_leaf_hashes(leaves.into_iter().map(|leaf| H::hash(leaf.as_ref())).collect())
    }

    /// Build a tree from already hashed leaves.
    pub fn from_leaf_hashes(leaves: Vec<MerkleHash>) -> Self {
        let span = trace_span!("build_merkle_tree", leaves = leaves.len());
        let _enter = span.enter();

        let mut levels = vec![leaves];
        while let Some(level) = levels.last() {
            if level.len() <= 1 {
                break;
            }
            let next = level
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => H::hash_pair(left, right),
                    [single] => H::hash_pair(single, single),
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            levels.push(next);
        }

        Self {
            levels,
            _hasher: PhantomData,
        }
    }

    /// Returns the root of the tree, or the zero hash if the tree has no leaves.
    pub fn root(&self) -> MerkleHash {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(ZERO_HASH)
    }

    /// Returns the number of leaves.
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of levels above the leaves, which is also the length of every proof.
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Returns the hash of the leaf at the given index.
    pub fn leaf(&self, index: usize) -> Option<MerkleHash> {
        self.levels[0].get(index).copied()
    }

    /// Returns the leaf hashes in order.
    pub fn leaves(&self) -> &[MerkleHash] {
        &self.levels[0]
    }

    /// Generate an inclusion proof for the leaf at the given index.
    pub fn prove(&self, index: usize) -> Result<MerkleProof, MerkleTreeError> {
        if index >= self.len() {
            return Err(MerkleTreeError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }

        let mut sibling_path = Vec::with_capacity(self.depth());
        let mut position = index;
        for level in &self.levels[..self.depth()] {
            let sibling = if position % 2 == 0 {
                // The last node of an odd level is paired with itself.
                level.get(position + 1).unwrap_or(&level[position])
            } else {
                &level[position - 1]
            };
            sibling_path.push(*sibling);
            position /= 2;
        }

        Ok(MerkleProof {
            leaf_index: index as u64,
            sibling_path,
        })
    }
}

impl<H: SimpleHasher> Clone for MerkleTree<H> {
    fn clone(&self) -> Self {
        Self {
            levels: self.levels.clone(),
            _hasher: PhantomData,
        }
    }
}

impl<H: SimpleHasher> std::fmt::Debug for MerkleTree<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerkleTree")
            .field("leaves", &self.len())
            .field("root", &hex::encode(self.root()))
            .finish()
    }
}
