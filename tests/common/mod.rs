//! Shared recording doubles for orchestrator tests.
//!
//! Every double appends to one [`EventLog`], so tests can assert on the
//! relative order of name reads, submissions, pauses and log output.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, TxHash, B256};
use async_trait::async_trait;

use contract_orchestrator::blockchain::{CallOutcome, ChainError, ChainResult, Wallet};
use contract_orchestrator::contract::{CallArg, ContractHandle, Target};
use contract_orchestrator::pacing::{Pacer, Pause};
use contract_orchestrator::report::{ProcessReporter, StateSnapshot, Stage};

/// First default Anvil/Hardhat account.
pub const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Read { method: String },
    Submit { signer: Address, method: String, args: Vec<CallArg> },
    Confirm(TxHash),
    Pause(Pause),
    Banner(String, Stage),
    Accounts { labels: Vec<String>, network: String },
    Parameters { labels: Vec<String> },
    Receipt(TxHash),
}

#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| pred(*e)).count()
    }

    pub fn position(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
        self.events().iter().position(pred)
    }
}

pub fn test_wallet() -> Wallet {
    Wallet::from_private_key(TEST_KEY, 31337).unwrap()
}

pub fn mock_tx_hash() -> TxHash {
    B256::repeat_byte(0x11)
}

/// Contract double with optional `name()`, optional failures and an
/// optional declared arity for interface checks.
pub struct MockContract {
    address: Address,
    name: Option<String>,
    name_error: Option<String>,
    revert_reason: Option<String>,
    confirm_revert_reason: Option<String>,
    arity: Option<usize>,
    log: EventLog,
}

impl MockContract {
    pub fn new(log: EventLog) -> Self {
        Self {
            address: Address::repeat_byte(0xcc),
            name: None,
            name_error: None,
            revert_reason: None,
            confirm_revert_reason: None,
            arity: None,
            log,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn failing_name(mut self, message: &str) -> Self {
        self.name_error = Some(message.to_string());
        self
    }

    pub fn reverting(mut self, reason: &str) -> Self {
        self.revert_reason = Some(reason.to_string());
        self
    }

    /// Accept submission but fail while waiting for the receipt.
    pub fn reverting_on_confirm(mut self, reason: &str) -> Self {
        self.confirm_revert_reason = Some(reason.to_string());
        self
    }

    /// Declare that every method takes exactly `arity` arguments.
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    pub fn named(self) -> Target {
        Target::named(self)
    }

    pub fn anonymous(self) -> Target {
        Target::anonymous(self)
    }
}

#[async_trait]
impl ContractHandle for MockContract {
    fn address(&self) -> Address {
        self.address
    }

    fn check_call(&self, method: &str, args: &[CallArg]) -> ChainResult<()> {
        match self.arity {
            Some(arity) if arity != args.len() => Err(ChainError::Abi(format!(
                "Method '{}' does not take {} argument(s)",
                method,
                args.len()
            ))),
            _ => Ok(()),
        }
    }

    async fn read(&self, method: &str, _args: &[CallArg]) -> ChainResult<Vec<DynSolValue>> {
        self.log.push(Event::Read {
            method: method.to_string(),
        });
        if let Some(message) = &self.name_error {
            return Err(ChainError::Rpc(message.clone()));
        }
        match (method, &self.name) {
            ("name", Some(name)) => Ok(vec![DynSolValue::String(name.clone())]),
            _ => Err(ChainError::Abi(format!("Unknown method '{}'", method))),
        }
    }

    async fn submit(&self, signer: &Wallet, method: &str, args: &[CallArg]) -> ChainResult<TxHash> {
        self.log.push(Event::Submit {
            signer: signer.address(),
            method: method.to_string(),
            args: args.to_vec(),
        });
        match &self.revert_reason {
            Some(reason) => Err(ChainError::Reverted(reason.clone())),
            None => Ok(mock_tx_hash()),
        }
    }

    async fn confirm(&self, tx_hash: TxHash) -> ChainResult<CallOutcome> {
        self.log.push(Event::Confirm(tx_hash));
        if let Some(reason) = &self.confirm_revert_reason {
            return Err(ChainError::Reverted(reason.clone()));
        }
        Ok(CallOutcome {
            tx_hash,
            block_number: Some(7),
            gas_used: 21_000,
            success: true,
            contract_address: None,
        })
    }
}

/// Pacer that records pauses without waiting.
pub struct RecordingPacer {
    log: EventLog,
}

impl RecordingPacer {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, kind: Pause) {
        self.log.push(Event::Pause(kind));
    }
}

/// Reporter that records each logging step.
pub struct RecordingReporter {
    log: EventLog,
}

impl RecordingReporter {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl ProcessReporter for RecordingReporter {
    fn banner(&self, method: &str, stage: Stage) {
        self.log.push(Event::Banner(method.to_string(), stage));
    }

    async fn log_accounts_info(&self, _addresses: &[Address], labels: &[String], network: &str) {
        self.log.push(Event::Accounts {
            labels: labels.to_vec(),
            network: network.to_string(),
        });
    }

    async fn log_process_parameters(
        &self,
        _contract: &dyn ContractHandle,
        _signer: &Wallet,
        _method: &str,
        _values: &[CallArg],
        labels: &[String],
    ) -> StateSnapshot {
        self.log.push(Event::Parameters {
            labels: labels.to_vec(),
        });
        StateSnapshot::default()
    }

    async fn log_process_receipt(
        &self,
        _contract: &dyn ContractHandle,
        _signer: &Wallet,
        _method: &str,
        _values: &[CallArg],
        outcome: &CallOutcome,
        _before: StateSnapshot,
    ) {
        self.log.push(Event::Receipt(outcome.tx_hash));
    }
}
