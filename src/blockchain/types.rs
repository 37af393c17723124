//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionReceipt;
use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction {0} not confirmed in time")]
    ConfirmationTimeout(TxHash),

    /// Call was reverted, either during submission or on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Invalid private key format or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Unknown method, bad arity or undecodable return data.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Contract artifact could not be read.
    #[error("Artifact error: {0}")]
    Artifact(String),
}

impl From<RpcError<TransportErrorKind>> for ChainError {
    /// JSON-RPC error responses that mention a revert keep the node's message
    /// verbatim so callers see the contract's reason.
    fn from(err: RpcError<TransportErrorKind>) -> Self {
        if let Some(payload) = err.as_error_resp() {
            if payload.message.to_lowercase().contains("revert") {
                return ChainError::Reverted(payload.message.to_string());
            }
        }
        ChainError::Rpc(err.to_string())
    }
}

/// Result type for blockchain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is pending in mempool.
    Pending,
    /// Transaction has been mined but not enough confirmations.
    Confirming { current: u64, required: u64 },
    /// Transaction is confirmed with required block depth.
    Confirmed { block_number: u64 },
    /// Transaction failed on-chain.
    Failed(String),
}

/// Result of a confirmed state-changing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    /// Hash of the submitted transaction.
    pub tx_hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// Gas consumed by the transaction.
    pub gas_used: u64,
    /// Receipt status flag.
    pub success: bool,
    /// Address of a newly deployed contract, if any.
    pub contract_address: Option<Address>,
}

impl From<&TransactionReceipt> for CallOutcome {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            success: receipt.status(),
            contract_address: receipt.contract_address,
        }
    }
}
