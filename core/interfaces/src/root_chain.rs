use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionReceipt};
use thiserror::Error;

/// Access to the root chain through generic call primitives.
///
/// Read-only calls and state-changing transactions are separate operations with their own
/// result shapes: a call returns the raw return data, a transaction returns its receipt once
/// it is included.
#[async_trait]
pub trait RootChainCaller: Send + Sync {
    /// Execute a read-only call against the contract at `to` and return the raw output.
    async fn read_call(&self, to: Address, input: Bytes) -> Result<Bytes, CallError>;

    /// Submit a transaction to the contract at `to` and wait for its receipt.
    async fn submit_transaction(
        &self,
        to: Address,
        input: Bytes,
    ) -> Result<TransactionReceipt, TransactionError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Call reverted: {0}")]
    Reverted(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Transaction dropped before inclusion")]
    Dropped,

    #[error("Transport error: {0}")]
    Transport(String),
}
