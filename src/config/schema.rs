//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! orchestrator. All types derive Serde traits for deserialization from
//! config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the contract orchestrator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ScriptConfig {
    /// Network endpoint and confirmation settings.
    pub network: NetworkConfig,

    /// Client-side pacing between calls.
    pub timing: TimingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Known deployed contracts.
    pub contracts: ContractsConfig,
}

/// Network connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Display name used in account logs (e.g., "goerli", "localhost").
    pub name: String,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil/Hardhat).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required before a call counts as applied.
    pub confirmation_blocks: u64,

    /// Maximum time to wait for confirmation in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "localhost".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 1_000,
        }
    }
}

impl NetworkConfig {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// How request pauses are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PacingMode {
    /// Sleep the configured delay every time.
    #[default]
    Fixed,
    /// Request pauses draw from a token bucket.
    TokenBucket,
}

/// Pacing configuration.
///
/// Both delays are fixed for the process lifetime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Pause after a read-only probe, in milliseconds.
    pub request_delay_ms: u64,

    /// Pause after a full orchestrated call, in milliseconds.
    pub process_delay_ms: u64,

    /// Pacing strategy.
    pub mode: PacingMode,

    /// Token refill rate for `token_bucket` mode.
    pub requests_per_second: u32,

    /// Bucket capacity for `token_bucket` mode.
    pub burst_size: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1_000,
            process_delay_ms: 5_000,
            mode: PacingMode::Fixed,
            requests_per_second: 1,
            burst_size: 1,
        }
    }
}

impl TimingConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn process_delay(&self) -> Duration {
        Duration::from_millis(self.process_delay_ms)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Addresses and artifacts of deployed contracts.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractsConfig {
    /// Ballot voting contract.
    pub ballot: Option<ContractEntry>,

    /// Token contract exposing `transfer`.
    pub token: Option<ContractEntry>,
}

/// A deployed contract reference.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractEntry {
    /// Deployed address (hex, 0x-prefixed).
    pub address: String,

    /// Path to the Hardhat artifact or bare ABI JSON.
    pub artifact: String,
}
