//! Client-side pacing between calls.
//!
//! # Pauses
//! - `Request`: after a read-only probe, before further traffic
//! - `Process`: after a full orchestrated call, before returning
//!
//! All waits go through `tokio::time`, so tests can drive them with a
//! paused clock.

pub mod fixed;
pub mod token_bucket;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{PacingMode, TimingConfig};

pub use fixed::FixedDelays;
pub use token_bucket::TokenBucketPacer;

/// Kind of pause requested by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Request,
    Process,
}

impl Pause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pause::Request => "request",
            Pause::Process => "process",
        }
    }
}

/// Throttling policy injected into the orchestrator.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, kind: Pause);
}

/// Build the pacer selected by `timing.mode`.
pub fn pacer_from_config(timing: &TimingConfig) -> Arc<dyn Pacer> {
    match timing.mode {
        PacingMode::Fixed => Arc::new(FixedDelays::from_config(timing)),
        PacingMode::TokenBucket => Arc::new(TokenBucketPacer::from_config(timing)),
    }
}
