//! Transaction orchestration.
//!
//! # Pipeline
//! ```text
//! validate request + check against the target's interface (no network)
//!     → banner "<Method> Process Initialized"
//!     → resolve display name (Named: name() + request pause, Anonymous: "null")
//!     → log accounts → log parameters (before snapshot)
//!     → submit → wait for confirmation
//!     → log receipt → banner "<Method> Process Finalized"
//!     → process pause
//! ```
//!
//! Single attempt, strictly sequential. Failures propagate unchanged; there
//! is no retry and no rollback.

pub mod request;

use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use thiserror::Error;

use crate::blockchain::types::{CallOutcome, ChainError};
use crate::blockchain::wallet::Wallet;
use crate::contract::handle::{ContractHandle, Target};
use crate::observability::metrics;
use crate::pacing::{Pacer, Pause};
use crate::report::{ProcessReporter, Stage};

pub use request::{CallRequest, Party};

/// Display name used for targets without a `name()` accessor.
pub const ANONYMOUS_TARGET_NAME: &str = "null";

/// Errors returned by [`Orchestrator::execute`].
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Malformed request, detected before any network interaction.
    #[error("Invalid call request: {0}")]
    InvalidRequest(String),

    /// Remote failure, propagated as-is.
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Check `request` on its own and against the target's interface.
///
/// Runs before any output or network traffic; every failure is
/// [`OrchestratorError::InvalidRequest`].
pub fn preflight(target: &Target, request: &CallRequest) -> Result<(), OrchestratorError> {
    request.validate()?;
    target
        .handle()
        .check_call(request.method(), request.values())
        .map_err(|e| OrchestratorError::InvalidRequest(e.to_string()))
}

/// Runs one state-changing call end to end.
#[derive(Clone)]
pub struct Orchestrator {
    reporter: Arc<dyn ProcessReporter>,
    pacer: Arc<dyn Pacer>,
    network: String,
}

impl Orchestrator {
    pub fn new(
        reporter: Arc<dyn ProcessReporter>,
        pacer: Arc<dyn Pacer>,
        network: impl Into<String>,
    ) -> Self {
        Self {
            reporter,
            pacer,
            network: network.into(),
        }
    }

    /// Execute `request` against `target`, originated by `signer`.
    pub async fn execute(
        &self,
        target: &Target,
        signer: &Wallet,
        request: &CallRequest,
    ) -> Result<CallOutcome, OrchestratorError> {
        if let Err(e) = preflight(target, request) {
            metrics::record_call(request.method(), "invalid");
            return Err(e);
        }

        let method = request.method();
        let contract = target.handle();
        self.reporter.banner(method, Stage::Initialized);

        let name = self.display_name(target).await?;

        let mut addresses = vec![contract.address(), signer.address()];
        let mut labels = vec![name, "signer".to_string()];
        for party in request.counterparts() {
            addresses.push(party.address);
            labels.push(party.label.clone());
        }
        self.reporter
            .log_accounts_info(&addresses, &labels, &self.network)
            .await;

        let before = self
            .reporter
            .log_process_parameters(contract, signer, method, request.values(), request.labels())
            .await;

        let outcome = match self.submit_and_confirm(contract, signer, request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(method = %method, contract = %contract.address(), error = %e, "Call failed");
                metrics::record_call(method, "failed");
                return Err(e.into());
            }
        };

        self.reporter
            .log_process_receipt(contract, signer, method, request.values(), &outcome, before)
            .await;
        self.reporter.banner(method, Stage::Finalized);
        metrics::record_call(method, "confirmed");

        self.pacer.pause(Pause::Process).await;
        Ok(outcome)
    }

    async fn submit_and_confirm(
        &self,
        contract: &dyn ContractHandle,
        signer: &Wallet,
        request: &CallRequest,
    ) -> Result<CallOutcome, ChainError> {
        let tx_hash = contract
            .submit(signer, request.method(), request.values())
            .await?;
        tracing::info!(tx_hash = %tx_hash, method = %request.method(), "Awaiting confirmation");
        contract.confirm(tx_hash).await
    }

    /// Named targets are probed once and followed by a request pause; a
    /// failed probe is an error, not a fallback to the placeholder.
    async fn display_name(&self, target: &Target) -> Result<String, OrchestratorError> {
        let handle = match target {
            Target::Anonymous(_) => return Ok(ANONYMOUS_TARGET_NAME.to_string()),
            Target::Named(handle) => handle,
        };

        let values = match handle.read("name", &[]).await {
            Ok(values) => values,
            Err(e) => {
                metrics::record_name_probe("failed");
                return Err(e.into());
            }
        };
        metrics::record_name_probe("ok");
        self.pacer.pause(Pause::Request).await;

        match values.first() {
            Some(DynSolValue::String(name)) => Ok(name.clone()),
            other => Err(ChainError::Abi(format!(
                "name() of {} returned {:?}, expected a string",
                handle.address(),
                other
            ))
            .into()),
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("network", &self.network)
            .finish()
    }
}
