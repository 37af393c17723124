//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, rates > 0)
//! - Check that URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ScriptConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::config::schema::{ContractEntry, PacingMode, ScriptConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ScriptConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let network = &config.network;
    if let Err(e) = network.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new(
            "network.rpc_url",
            format!("invalid URL '{}': {}", network.rpc_url, e),
        ));
    }
    if network.chain_id == 0 {
        errors.push(ValidationError::new("network.chain_id", "must be non-zero"));
    }
    if network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "network.rpc_timeout_secs",
            "must be greater than 0",
        ));
    }
    if network.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "network.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if network.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "network.poll_interval_ms",
            "must be greater than 0",
        ));
    }

    let timing = &config.timing;
    if timing.mode == PacingMode::TokenBucket {
        if timing.requests_per_second == 0 {
            errors.push(ValidationError::new(
                "timing.requests_per_second",
                "must be greater than 0 in token_bucket mode",
            ));
        }
        if timing.burst_size == 0 {
            errors.push(ValidationError::new(
                "timing.burst_size",
                "must be greater than 0 in token_bucket mode",
            ));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "invalid socket address '{}'",
                config.observability.metrics_address
            ),
        ));
    }

    for (name, entry) in [
        ("contracts.ballot", &config.contracts.ballot),
        ("contracts.token", &config.contracts.token),
    ] {
        if let Some(entry) = entry {
            check_contract(name, entry, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_contract(name: &str, entry: &ContractEntry, errors: &mut Vec<ValidationError>) {
    if entry.address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            format!("{name}.address"),
            format!("invalid address '{}'", entry.address),
        ));
    }
    if entry.artifact.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{name}.artifact"),
            "must not be empty",
        ));
    }
}
