use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleTreeError {
    #[error("leaf index {index} out of range (tree has {len} leaves)")]
    IndexOutOfRange { index: usize, len: usize },
}
