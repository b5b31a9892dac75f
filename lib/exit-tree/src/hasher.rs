/// A 32-byte merkle tree node hash.
pub type MerkleHash = [u8; 32];

/// The root of an empty tree.
pub const ZERO_HASH: MerkleHash = [0u8; 32];

/// A simple incremental hasher with a 32-byte output, used for both leaves and internal nodes.
pub trait SimpleHasher: Sized {
    fn new() -> Self;

    fn update(&mut self, data: &[u8]);

    fn finalize(self) -> MerkleHash;

    /// Hash a single byte string.
    fn hash(data: &[u8]) -> MerkleHash {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }

    /// Hash two nodes in order, `hash(left || right)`.
    fn hash_pair(left: &MerkleHash, right: &MerkleHash) -> MerkleHash {
        let mut hasher = Self::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize()
    }
}
