use ethers::types::H256;
use exit_tree::MerkleProof;
use serde::{Deserialize, Serialize};

use crate::{BlockNumber, ExitEvent};

/// The inclusion proof of an exit event in the event tree of its checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitProof {
    pub leaf_index: u64,
    pub sibling_path: Vec<H256>,
}

impl ExitProof {
    pub fn to_merkle_proof(&self) -> MerkleProof {
        MerkleProof {
            leaf_index: self.leaf_index,
            sibling_path: self.sibling_path.iter().map(|h| h.0).collect(),
        }
    }
}

impl From<MerkleProof> for ExitProof {
    fn from(proof: MerkleProof) -> Self {
        Self {
            leaf_index: proof.leaf_index,
            sibling_path: proof.sibling_path.into_iter().map(H256).collect(),
        }
    }
}

/// The JSON shape returned by `bridge_generateExitProof`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitProofResponse {
    /// The sibling path, leaf to root.
    pub data: Vec<H256>,
    pub metadata: ExitProofMetadata,
}

/// Clients read the metadata keys in PascalCase, unlike the envelope around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExitProofMetadata {
    pub leaf_index: u64,
    pub checkpoint_block: BlockNumber,
    pub exit_event: ExitEvent,
}

impl ExitProofResponse {
    pub fn new(proof: ExitProof, checkpoint_block: BlockNumber, exit_event: ExitEvent) -> Self {
        Self {
            data: proof.sibling_path,
            metadata: ExitProofMetadata {
                leaf_index: proof.leaf_index,
                checkpoint_block,
                exit_event,
            },
        }
    }

    pub fn proof(&self) -> ExitProof {
        ExitProof {
            leaf_index: self.metadata.leaf_index,
            sibling_path: self.data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ethers::types::{Address, Bytes};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_response_json_shape() {
        let response = ExitProofResponse::new(
            ExitProof {
                leaf_index: 1,
                sibling_path: vec![H256::repeat_byte(0xab)],
            },
            120,
            ExitEvent {
                id: 11,
                sender: Address::repeat_byte(1),
                receiver: Address::repeat_byte(2),
                data: Bytes::from(vec![0xde, 0xad]),
            },
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["metadata"]["LeafIndex"], 1);
        assert_eq!(json["metadata"]["CheckpointBlock"], 120);
        assert_eq!(json["metadata"]["ExitEvent"]["id"], 11);
        assert_eq!(json["metadata"]["ExitEvent"]["data"], "0xdead");
        assert!(json["metadata"].get("leafIndex").is_none());
        assert_eq!(
            json["data"][0],
            format!("0x{}", "ab".repeat(32)).as_str()
        );

        let back: ExitProofResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
        assert_eq!(back.proof().leaf_index, 1);
    }
}
