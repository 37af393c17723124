//! Progress and result reporting for orchestrated calls.
//!
//! The orchestrator hands every human-readable step to a [`ProcessReporter`]:
//! banners, the parties involved, the call parameters (returning a "before"
//! snapshot) and the receipt compared against that snapshot.

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::blockchain::client::StateReader;
use crate::blockchain::types::CallOutcome;
use crate::blockchain::wallet::Wallet;
use crate::contract::args::CallArg;
use crate::contract::handle::ContractHandle;

/// Pipeline stage announced by a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Initialized,
    Finalized,
}

/// Banner line for `method` at `stage`, e.g. `----- Transfer Process Initialized -----`.
pub fn banner_text(method: &str, stage: Stage) -> String {
    let mut chars = method.chars();
    let title = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    let stage = match stage {
        Stage::Initialized => "Initialized",
        Stage::Finalized => "Finalized",
    };
    format!("----- {} Process {} -----", title, stage)
}

/// Balances captured before a call, for comparison after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    balances: Vec<(Address, U256)>,
}

impl StateSnapshot {
    pub fn new(balances: Vec<(Address, U256)>) -> Self {
        Self { balances }
    }

    pub fn balance(&self, address: &Address) -> Option<U256> {
        self.balances
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, b)| *b)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Address, U256)> {
        self.balances.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// Logging collaborator of the orchestrator.
#[async_trait]
pub trait ProcessReporter: Send + Sync {
    fn banner(&self, method: &str, stage: Stage);

    async fn log_accounts_info(&self, addresses: &[Address], labels: &[String], network: &str);

    async fn log_process_parameters(
        &self,
        contract: &dyn ContractHandle,
        signer: &Wallet,
        method: &str,
        values: &[CallArg],
        labels: &[String],
    ) -> StateSnapshot;

    async fn log_process_receipt(
        &self,
        contract: &dyn ContractHandle,
        signer: &Wallet,
        method: &str,
        values: &[CallArg],
        outcome: &CallOutcome,
        before: StateSnapshot,
    );
}

/// Addresses whose balances are tracked for a call: signer first, then
/// every address argument, without duplicates.
pub fn tracked_addresses(signer: Address, values: &[CallArg]) -> Vec<Address> {
    let mut tracked = vec![signer];
    for address in values.iter().filter_map(CallArg::as_address) {
        if !tracked.contains(&address) {
            tracked.push(address);
        }
    }
    tracked
}

/// Reporter writing `tracing` events, with native balance snapshots.
pub struct TracingReporter<S> {
    state: S,
}

impl<S: StateReader> TracingReporter<S> {
    pub fn new(state: S) -> Self {
        Self { state }
    }

    async fn snapshot(&self, addresses: &[Address]) -> StateSnapshot {
        let mut balances = Vec::with_capacity(addresses.len());
        for address in addresses {
            match self.state.balance_of(*address).await {
                Ok(balance) => balances.push((*address, balance)),
                Err(e) => tracing::warn!(address = %address, error = %e, "Balance unavailable"),
            }
        }
        StateSnapshot::new(balances)
    }
}

#[async_trait]
impl<S: StateReader> ProcessReporter for TracingReporter<S> {
    fn banner(&self, method: &str, stage: Stage) {
        tracing::info!("{}", banner_text(method, stage));
    }

    async fn log_accounts_info(&self, addresses: &[Address], labels: &[String], network: &str) {
        tracing::info!(network = %network, "Accounts");
        for (address, label) in addresses.iter().zip(labels) {
            match self.state.balance_of(*address).await {
                Ok(balance) => tracing::info!(
                    label = %label,
                    address = %address,
                    balance_eth = %format_ether(balance),
                    "Account"
                ),
                Err(_) => tracing::info!(label = %label, address = %address, "Account"),
            }
        }
    }

    async fn log_process_parameters(
        &self,
        contract: &dyn ContractHandle,
        signer: &Wallet,
        method: &str,
        values: &[CallArg],
        labels: &[String],
    ) -> StateSnapshot {
        tracing::info!(
            contract = %contract.address(),
            signer = %signer.address(),
            method = %method,
            "Call parameters"
        );
        for (label, value) in labels.iter().zip(values) {
            tracing::info!(param = %label, value = %value, "Argument");
        }
        self.snapshot(&tracked_addresses(signer.address(), values)).await
    }

    async fn log_process_receipt(
        &self,
        contract: &dyn ContractHandle,
        signer: &Wallet,
        method: &str,
        values: &[CallArg],
        outcome: &CallOutcome,
        before: StateSnapshot,
    ) {
        tracing::info!(
            contract = %contract.address(),
            method = %method,
            tx_hash = %outcome.tx_hash,
            block_number = outcome.block_number.unwrap_or_default(),
            gas_used = outcome.gas_used,
            success = outcome.success,
            "Call receipt"
        );

        let after = self.snapshot(&tracked_addresses(signer.address(), values)).await;
        for (address, now) in after.iter() {
            if let Some(then) = before.balance(address) {
                tracing::info!(
                    address = %address,
                    before_eth = %format_ether(then),
                    after_eth = %format_ether(*now),
                    "Balance"
                );
            }
        }
    }
}
