//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (PRIVATE_KEY) + config (RPC URL)
//!     → wallet.rs (key loading)
//!     → client.rs (RPC connection with timeouts, signed sends)
//!     → transaction.rs (confirmation monitoring)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChainClient, StateReader};
pub use transaction::wait_for_confirmation;
pub use types::{CallOutcome, ChainError, ChainId, ChainResult};
pub use wallet::Wallet;
