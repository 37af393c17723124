//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint
//! - Query chain state (block number, balances, receipts)
//! - Execute read-only calls and submit signed transactions
//! - Handle timeouts and network errors gracefully

use std::future::IntoFuture;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::TransportResult;
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::types::{ChainError, ChainId, ChainResult};
use crate::blockchain::wallet::Wallet;
use crate::config::NetworkConfig;

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct ChainClient {
    provider: DynProvider,
    config: NetworkConfig,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a new blockchain client.
    ///
    /// Does not touch the network; call [`ChainClient::verify_chain_id`] to
    /// check connectivity.
    pub fn new(config: NetworkConfig) -> ChainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        tracing::debug!(
            rpc_url = %config.rpc_url,
            chain_id = config.chain_id,
            "Blockchain client created"
        );

        Ok(Self {
            provider,
            timeout_duration: config.rpc_timeout(),
            config,
        })
    }

    /// Run an RPC future under the configured request timeout.
    async fn timed<T, F>(&self, fut: F) -> ChainResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        match timeout(self.timeout_duration, fut.into_future()).await {
            Ok(result) => result.map_err(ChainError::from),
            Err(_) => Err(ChainError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        tracing::info!(
            network = %self.config.name,
            chain_id = chain_id.0,
            "Connected to network"
        );
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> ChainResult<ChainId> {
        self.timed(self.provider.get_chain_id()).await.map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> ChainResult<u64> {
        self.timed(self.provider.get_block_number()).await
    }

    /// Get the native balance of an address.
    pub async fn get_balance(&self, address: Address) -> ChainResult<U256> {
        self.timed(self.provider.get_balance(address)).await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> ChainResult<Option<TransactionReceipt>> {
        self.timed(self.provider.get_transaction_receipt(tx_hash)).await
    }

    /// Execute a read-only call (`eth_call`) and return the raw output.
    pub async fn call(&self, tx: TransactionRequest) -> ChainResult<Bytes> {
        self.timed(self.provider.call(tx)).await
    }

    /// Sign `tx` with `signer` and broadcast it.
    ///
    /// Nonce, gas and chain ID are filled by the provider. Simulation failures
    /// (reverts during gas estimation) surface here.
    pub async fn send(&self, signer: &Wallet, tx: TransactionRequest) -> ChainResult<TxHash> {
        let tx = tx.from(signer.address());
        let provider = ProviderBuilder::new()
            .wallet(signer.ethereum_wallet())
            .connect_provider(self.provider.root().clone());

        let pending = self.timed(provider.send_transaction(tx)).await?;
        let tx_hash = *pending.tx_hash();
        tracing::debug!(tx_hash = %tx_hash, from = %signer.address(), "Transaction broadcast");
        Ok(tx_hash)
    }

    /// Get the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Get the number of confirmation blocks required.
    pub fn confirmation_blocks(&self) -> u64 {
        self.config.confirmation_blocks
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("network", &self.config.name)
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

/// Read access to account state used for before/after snapshots.
#[async_trait]
pub trait StateReader: Send + Sync {
    async fn balance_of(&self, address: Address) -> ChainResult<U256>;
}

#[async_trait]
impl StateReader for ChainClient {
    async fn balance_of(&self, address: Address) -> ChainResult<U256> {
        self.get_balance(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> NetworkConfig {
        NetworkConfig {
            // Nothing listens on port 1
            rpc_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 2,
            ..NetworkConfig::default()
        }
    }

    #[test]
    fn test_client_creation_is_offline() {
        let client = ChainClient::new(test_config()).unwrap();
        assert_eq!(client.confirmation_blocks(), 1);
        assert!(format!("{:?}", client).contains("127.0.0.1:1"));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        let err = ChainClient::new(config).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_errors() {
        let client = ChainClient::new(test_config()).unwrap();
        let result = client.get_block_number().await;
        assert!(matches!(
            result,
            Err(ChainError::Rpc(_)) | Err(ChainError::Timeout(_))
        ));
    }
}
