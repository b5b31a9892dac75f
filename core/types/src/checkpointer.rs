use std::fmt;

use bit_set::BitSet;
use bridge_crypto::ConsensusAggregateSignature;
use ethers::abi::{self, Token};
use ethers::types::H256;
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};

use crate::{BlockNumber, Epoch, ExitEvent};

/// An inclusive range of child chain blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockRange {
    pub start: BlockNumber,
    pub end: BlockNumber,
}

impl BlockRange {
    pub fn new(start: BlockNumber, end: BlockNumber) -> Self {
        Self { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn overlaps(&self, other: &BlockRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, block: BlockNumber) -> bool {
        self.start <= block && block <= self.end
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// The part of a checkpoint the validators sign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckpointCommitment {
    pub epoch: Epoch,
    pub start_block: BlockNumber,
    pub end_block: BlockNumber,
    pub event_root: H256,
    pub validator_set_hash: H256,
}

impl CheckpointCommitment {
    pub fn block_range(&self) -> BlockRange {
        BlockRange::new(self.start_block, self.end_block)
    }

    /// The message validators sign: the keccak hash of the ABI encoded commitment.
    pub fn digest(&self) -> [u8; 32] {
        keccak256(abi::encode(&[
            Token::Uint(self.epoch.into()),
            Token::Uint(self.start_block.into()),
            Token::Uint(self.end_block.into()),
            Token::FixedBytes(self.event_root.as_bytes().to_vec()),
            Token::FixedBytes(self.validator_set_hash.as_bytes().to_vec()),
        ]))
    }
}

/// A BLS aggregate signature together with the bitmap of validator indices that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedSignature {
    pub signature: ConsensusAggregateSignature,
    pub signers: BitSet,
}

/// A signed commitment binding a child chain block range to the root of its exit events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub commitment: CheckpointCommitment,
    pub aggregated_signature: AggregatedSignature,
}

impl Checkpoint {
    pub fn epoch(&self) -> Epoch {
        self.commitment.epoch
    }

    pub fn block_range(&self) -> BlockRange {
        self.commitment.block_range()
    }

    /// The block the checkpoint is referenced by on the root chain.
    pub fn checkpoint_block(&self) -> BlockNumber {
        self.commitment.end_block
    }

    pub fn event_root(&self) -> H256 {
        self.commitment.event_root
    }
}

/// A checkpoint that was submitted, along with the exit events its event root commits to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointedBatch {
    pub checkpoint: Checkpoint,
    pub events: Vec<ExitEvent>,
}
