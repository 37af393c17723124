//! EVM contract handle over an alloy provider.

use std::path::Path;
use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::blockchain::client::ChainClient;
use crate::blockchain::transaction::wait_for_confirmation;
use crate::blockchain::types::{CallOutcome, ChainError, ChainResult};
use crate::blockchain::wallet::Wallet;
use crate::config::ContractEntry;
use crate::contract::args::CallArg;
use crate::contract::artifact::ContractArtifact;
use crate::contract::handle::{ContractHandle, Target};

/// A deployed contract described by an ABI.
#[derive(Clone)]
pub struct EvmContract {
    address: Address,
    artifact: Arc<ContractArtifact>,
    client: ChainClient,
}

impl EvmContract {
    pub fn new(client: ChainClient, address: Address, artifact: ContractArtifact) -> Self {
        Self {
            address,
            artifact: Arc::new(artifact),
            client,
        }
    }

    /// Attach to a configured contract, loading its artifact from disk.
    pub fn attach(client: ChainClient, entry: &ContractEntry) -> ChainResult<Self> {
        let address: Address = entry
            .address
            .parse()
            .map_err(|e| ChainError::Abi(format!("Invalid contract address '{}': {}", entry.address, e)))?;
        let artifact = ContractArtifact::load(Path::new(&entry.artifact))?;
        Ok(Self::new(client, address, artifact))
    }

    /// Deploy `artifact` with constructor `args` and wait for confirmation.
    pub async fn deploy(
        client: ChainClient,
        signer: &Wallet,
        artifact: ContractArtifact,
        args: &[CallArg],
    ) -> ChainResult<(Self, CallOutcome)> {
        let code = artifact.deploy_code(args)?;
        let tx = TransactionRequest::default().with_deploy_code(code);

        tracing::info!(
            contract = artifact.contract_name.as_deref().unwrap_or("<unnamed>"),
            deployer = %signer.address(),
            "Deploying contract"
        );
        let tx_hash = client.send(signer, tx).await?;
        let outcome = wait_for_confirmation(&client, tx_hash).await?;
        let address = outcome.contract_address.ok_or_else(|| {
            ChainError::Rpc(format!("Receipt of {} has no contract address", tx_hash))
        })?;
        tracing::info!(address = %address, tx_hash = %tx_hash, "Contract deployed");

        Ok((Self::new(client, address, artifact), outcome))
    }

    pub fn artifact(&self) -> &ContractArtifact {
        &self.artifact
    }

    /// Wrap as a [`Target`], named iff the ABI declares `name()`.
    pub fn into_target(self) -> Target {
        if self.artifact.has_name_accessor() {
            Target::named(self)
        } else {
            Target::anonymous(self)
        }
    }

    fn request(&self, method: &str, args: &[CallArg]) -> ChainResult<TransactionRequest> {
        let data = self.artifact.encode_call(method, args)?;
        Ok(TransactionRequest::default()
            .with_to(self.address)
            .with_input(data))
    }
}

#[async_trait]
impl ContractHandle for EvmContract {
    fn address(&self) -> Address {
        self.address
    }

    fn check_call(&self, method: &str, args: &[CallArg]) -> ChainResult<()> {
        self.artifact.encode_call(method, args).map(|_| ())
    }

    async fn read(&self, method: &str, args: &[CallArg]) -> ChainResult<Vec<DynSolValue>> {
        let tx = self.request(method, args)?;
        let output = self.client.call(tx).await?;
        self.artifact.decode_output(method, args.len(), &output)
    }

    async fn submit(&self, signer: &Wallet, method: &str, args: &[CallArg]) -> ChainResult<TxHash> {
        let tx = self.request(method, args)?;
        self.client.send(signer, tx).await
    }

    async fn confirm(&self, tx_hash: TxHash) -> ChainResult<CallOutcome> {
        wait_for_confirmation(&self.client, tx_hash).await
    }
}

impl std::fmt::Debug for EvmContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmContract")
            .field("address", &self.address)
            .field("contract", &self.artifact.contract_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;

    const NAMED_ABI: &str = r#"[
        {"type":"function","name":"name","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
        {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"}
    ]"#;

    const ANONYMOUS_ABI: &str = r#"[
        {"type":"function","name":"vote","inputs":[{"name":"proposal","type":"uint256"}],"outputs":[],"stateMutability":"nonpayable"}
    ]"#;

    fn offline_client() -> ChainClient {
        ChainClient::new(NetworkConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            ..NetworkConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_target_resolution_from_abi() {
        let named = EvmContract::new(
            offline_client(),
            Address::repeat_byte(1),
            ContractArtifact::from_json(NAMED_ABI).unwrap(),
        );
        assert!(named.into_target().is_named());

        let anonymous = EvmContract::new(
            offline_client(),
            Address::repeat_byte(2),
            ContractArtifact::from_json(ANONYMOUS_ABI).unwrap(),
        );
        let target = anonymous.into_target();
        assert!(!target.is_named());
        assert_eq!(target.address(), Address::repeat_byte(2));
    }

    #[test]
    fn test_check_call_against_abi() {
        let contract = EvmContract::new(
            offline_client(),
            Address::repeat_byte(1),
            ContractArtifact::from_json(NAMED_ABI).unwrap(),
        );
        let to = CallArg::Address(Address::repeat_byte(9));

        assert!(contract.check_call("transfer", &[to.clone(), CallArg::from(1u64)]).is_ok());
        let err = contract.check_call("transfer", &[to]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ABI error: Method 'transfer' does not take 1 argument(s)"
        );
        assert!(contract.check_call("mint", &[]).is_err());
    }

    #[tokio::test]
    async fn test_bad_arguments_fail_before_network() {
        let contract = EvmContract::new(
            offline_client(),
            Address::repeat_byte(1),
            ContractArtifact::from_json(ANONYMOUS_ABI).unwrap(),
        );
        let wallet = Wallet::from_private_key(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            31337,
        )
        .unwrap();

        let err = contract
            .submit(&wallet, "vote", &[CallArg::Bool(true)])
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Abi(_)));
    }
}
