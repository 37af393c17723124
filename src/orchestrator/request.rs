//! Call requests: method name plus labelled positional arguments.

use alloy::primitives::Address;

use crate::contract::args::CallArg;
use crate::orchestrator::OrchestratorError;

/// An account shown alongside the target and signer in the accounts log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub address: Address,
    pub label: String,
}

/// One invocation of a state-mutating method.
///
/// Values and labels are kept as parallel sequences of equal length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    method: String,
    values: Vec<CallArg>,
    labels: Vec<String>,
    counterparts: Vec<Party>,
}

impl CallRequest {
    /// Start a request for `method` with no arguments.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            values: Vec::new(),
            labels: Vec::new(),
            counterparts: Vec::new(),
        }
    }

    /// Build a request from separate value and label sequences.
    pub fn from_parts(
        method: impl Into<String>,
        values: Vec<CallArg>,
        labels: Vec<String>,
    ) -> Result<Self, OrchestratorError> {
        let request = Self {
            method: method.into(),
            values,
            labels,
            counterparts: Vec::new(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Append a labelled argument.
    pub fn arg(mut self, label: impl Into<String>, value: impl Into<CallArg>) -> Self {
        self.labels.push(label.into());
        self.values.push(value.into());
        self
    }

    /// Add an account to the accounts log, e.g. the recipient of a transfer.
    pub fn counterpart(mut self, address: Address, label: impl Into<String>) -> Self {
        self.counterparts.push(Party {
            address,
            label: label.into(),
        });
        self
    }

    /// Check the request before any network interaction.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.method.trim().is_empty() {
            return Err(OrchestratorError::InvalidRequest(
                "method name is empty".to_string(),
            ));
        }
        if self.values.len() != self.labels.len() {
            return Err(OrchestratorError::InvalidRequest(format!(
                "'{}' has {} argument value(s) but {} label(s)",
                self.method,
                self.values.len(),
                self.labels.len()
            )));
        }
        if let Some(i) = self.labels.iter().position(|l| l.trim().is_empty()) {
            return Err(OrchestratorError::InvalidRequest(format!(
                "'{}' argument {} has an empty label",
                self.method, i
            )));
        }
        if let Some(party) = self.counterparts.iter().find(|p| p.label.trim().is_empty()) {
            return Err(OrchestratorError::InvalidRequest(format!(
                "counterpart {} has an empty label",
                party.address
            )));
        }
        Ok(())
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn values(&self) -> &[CallArg] {
        &self.values
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn counterparts(&self) -> &[Party] {
        &self.counterparts
    }
}
