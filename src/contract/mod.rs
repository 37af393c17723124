//! Contract interaction subsystem.
//!
//! # Data Flow
//! ```text
//! Hardhat artifact / ABI JSON
//!     → artifact.rs (parse, encode calls, decode outputs)
//!     → evm.rs (EvmContract: eth_call, signed sends, confirmation)
//!     → handle.rs (ContractHandle trait, Named/Anonymous Target)
//! ```

pub mod args;
pub mod artifact;
pub mod evm;
pub mod handle;

pub use args::{format_bytes32_string, parse_bytes32_string, CallArg};
pub use artifact::ContractArtifact;
pub use evm::EvmContract;
pub use handle::{ContractHandle, Target};
