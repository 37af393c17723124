//! Ready-made contract workflows built on the orchestrator.

pub mod ballot;
pub mod transfer;

pub use transfer::{transfer, transfer_request};
