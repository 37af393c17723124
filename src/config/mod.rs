//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ScriptConfig (validated, immutable for the process lifetime)
//!
//! PRIVATE_KEY (environment)
//!     → blockchain::wallet (never part of the config file)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ContractEntry, ContractsConfig, NetworkConfig, ObservabilityConfig, PacingMode, ScriptConfig,
    TimingConfig,
};
