use std::sync::Arc;

use bridge_interfaces::RootChainCaller;
use bridge_types::{
    Address,
    BlockNumber,
    EventCodec,
    ExitEvent,
    ExitEventId,
    ExitProof,
    ExitResult,
    U256,
};
use ethers::abi::{AbiDecode, AbiEncode, RawLog};
use ethers::contract::EthEvent;
use ethers::prelude::abigen;
use ethers::types::{Log, TransactionReceipt};

use crate::RelayerError;

abigen!(
    CheckpointManager,
    r"[
        function currentValidatorSetLength() view returns (uint256)
        function currentValidatorSet(uint256) view returns (address, uint256)
    ]"
);

abigen!(
    ExitHelper,
    r"[
        function exit(uint256 blockNumber, uint256 leafIndex, bytes unhashedLeaf, bytes32[] proof)
        function processedExits(uint256) view returns (bool)
        event ExitProcessed(uint256 indexed id, bool indexed success, bytes returnData)
    ]"
);

abigen!(L2StateSender, "./abi/L2StateSender.json");

/// The largest validator set accepted from the checkpoint manager.
pub const MAX_VALIDATOR_SET_LENGTH: u64 = 1 << 16;

/// The root chain contracts the bridge talks to, reached through a [`RootChainCaller`].
#[derive(Clone)]
pub struct RootChainContracts {
    caller: Arc<dyn RootChainCaller>,
    checkpoint_manager: Address,
    exit_helper: Address,
}

impl RootChainContracts {
    pub fn new(
        caller: Arc<dyn RootChainCaller>,
        checkpoint_manager: Address,
        exit_helper: Address,
    ) -> Self {
        Self {
            caller,
            checkpoint_manager,
            exit_helper,
        }
    }

    pub fn exit_helper(&self) -> Address {
        self.exit_helper
    }

    pub async fn current_validator_set_length(&self) -> Result<u64, RelayerError> {
        let output = self
            .caller
            .read_call(
                self.checkpoint_manager,
                CurrentValidatorSetLengthCall.encode().into(),
            )
            .await?;
        let CurrentValidatorSetLengthReturn(length) = decode_output(&output)?;
        to_u64(length)
    }

    /// The validator at `index` of the current set: its address and voting power.
    pub async fn current_validator(&self, index: u64) -> Result<(Address, U256), RelayerError> {
        let output = self
            .caller
            .read_call(
                self.checkpoint_manager,
                CurrentValidatorSetCall(index.into()).encode().into(),
            )
            .await?;
        let CurrentValidatorSetReturn(address, voting_power) = decode_output(&output)?;
        Ok((address, voting_power))
    }

    /// The whole current validator set, in contract order.
    ///
    /// A length above [`MAX_VALIDATOR_SET_LENGTH`] is rejected before any validator is read.
    pub async fn current_validator_set(&self) -> Result<Vec<(Address, U256)>, RelayerError> {
        let length = self.current_validator_set_length().await?;
        if length > MAX_VALIDATOR_SET_LENGTH {
            return Err(RelayerError::Decode(format!(
                "validator set length {length} exceeds {MAX_VALIDATOR_SET_LENGTH}"
            )));
        }
        let capacity = usize::try_from(length).map_err(|e| RelayerError::Decode(e.to_string()))?;
        let mut validators = Vec::with_capacity(capacity);
        for index in 0..length {
            validators.push(self.current_validator(index).await?);
        }
        Ok(validators)
    }

    pub async fn is_processed(&self, id: ExitEventId) -> Result<bool, RelayerError> {
        let output = self
            .caller
            .read_call(self.exit_helper, ProcessedExitsCall(id.into()).encode().into())
            .await?;
        let ProcessedExitsReturn(processed) = decode_output(&output)?;
        Ok(processed)
    }

    /// Submit an exit claim and return the receipt of the included transaction.
    pub async fn exit(
        &self,
        checkpoint_block: BlockNumber,
        event: &ExitEvent,
        proof: &ExitProof,
    ) -> Result<TransactionReceipt, RelayerError> {
        let call = ExitCall {
            block_number: checkpoint_block.into(),
            leaf_index: proof.leaf_index.into(),
            unhashed_leaf: event.encode().into(),
            proof: proof.sibling_path.iter().map(|hash| hash.0).collect(),
        };
        self.caller
            .submit_transaction(self.exit_helper, call.encode().into())
            .await
            .map_err(|source| RelayerError::Transaction {
                exit_id: event.id,
                source,
            })
    }

    /// The exit results announced by the exit helper in `receipt`.
    pub fn exit_results(
        &self,
        receipt: &TransactionReceipt,
    ) -> Result<Vec<ExitResult>, RelayerError> {
        receipt
            .logs
            .iter()
            .filter(|log| {
                log.address == self.exit_helper
                    && log.topics.first() == Some(&ExitProcessedFilter::signature())
            })
            .map(|log| {
                let event = ExitProcessedFilter::decode_log(&raw_log(log))
                    .map_err(|e| RelayerError::Decode(e.to_string()))?;
                Ok(ExitResult {
                    id: to_u64(event.id)?,
                    success: event.success,
                })
            })
            .collect()
    }
}

/// Decode the child chain log announcing a submitted exit into its exit event.
pub fn decode_exit_submitted(log: &Log) -> Result<ExitEvent, RelayerError> {
    let event = L2StateSyncedFilter::decode_log(&raw_log(log))
        .map_err(|e| RelayerError::Decode(e.to_string()))?;
    Ok(ExitEvent {
        id: to_u64(event.id)?,
        sender: event.sender,
        receiver: event.receiver,
        data: event.data,
    })
}

fn raw_log(log: &Log) -> RawLog {
    RawLog {
        topics: log.topics.clone(),
        data: log.data.to_vec(),
    }
}

fn decode_output<T: AbiDecode>(output: &[u8]) -> Result<T, RelayerError> {
    T::decode(output).map_err(|e| RelayerError::Decode(e.to_string()))
}

fn to_u64(value: U256) -> Result<u64, RelayerError> {
    if value > U256::from(u64::MAX) {
        return Err(RelayerError::Decode(format!("{value} does not fit in 64 bits")));
    }
    Ok(value.as_u64())
}
