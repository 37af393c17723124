//! Contract call orchestration library.

pub mod blockchain;
pub mod config;
pub mod contract;
pub mod observability;
pub mod orchestrator;
pub mod pacing;
pub mod report;
pub mod sequencer;
pub mod workflows;

pub use blockchain::{CallOutcome, ChainClient, ChainError, Wallet};
pub use config::schema::ScriptConfig;
pub use contract::{CallArg, ContractHandle, EvmContract, Target};
pub use orchestrator::{CallRequest, Orchestrator, OrchestratorError};
pub use sequencer::Sequencer;
