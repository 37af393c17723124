//! Batch execution of orchestrated calls, one at a time.
//!
//! Jobs run in FIFO order through a single [`Orchestrator`]; each waits out
//! the previous job's process pause. The first failure stops the batch and
//! leaves the remaining jobs queued.

use std::collections::VecDeque;

use crate::blockchain::types::CallOutcome;
use crate::blockchain::wallet::Wallet;
use crate::contract::handle::Target;
use crate::orchestrator::{preflight, CallRequest, Orchestrator, OrchestratorError};

/// One queued call.
#[derive(Debug, Clone)]
pub struct Job {
    pub target: Target,
    pub request: CallRequest,
}

/// The job that stopped a batch.
#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the failed job in submission order.
    pub index: usize,
    pub method: String,
    pub error: OrchestratorError,
}

/// Result of [`Sequencer::run`].
#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: Vec<CallOutcome>,
    pub failure: Option<BatchFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// FIFO queue of calls executed sequentially.
#[derive(Debug, Default)]
pub struct Sequencer {
    queue: VecDeque<Job>,
    started: usize,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: Target, request: CallRequest) -> &mut Self {
        self.queue.push_back(Job { target, request });
        self
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Run queued jobs until the queue is empty or a job fails.
    ///
    /// Every queued request is checked first, against its target's
    /// interface too; an invalid one fails the batch before any job touches
    /// the network.
    pub async fn run(&mut self, orchestrator: &Orchestrator, signer: &Wallet) -> BatchReport {
        let mut report = BatchReport::default();

        for (offset, job) in self.queue.iter().enumerate() {
            if let Err(error) = preflight(&job.target, &job.request) {
                report.failure = Some(BatchFailure {
                    index: self.started + offset,
                    method: job.request.method().to_string(),
                    error,
                });
                return report;
            }
        }

        tracing::info!(jobs = self.queue.len(), "Starting batch");
        while let Some(job) = self.queue.pop_front() {
            let index = self.started;
            self.started += 1;

            match orchestrator.execute(&job.target, signer, &job.request).await {
                Ok(outcome) => report.completed.push(outcome),
                Err(error) => {
                    tracing::error!(
                        index,
                        method = %job.request.method(),
                        remaining = self.queue.len(),
                        "Batch stopped"
                    );
                    report.failure = Some(BatchFailure {
                        index,
                        method: job.request.method().to_string(),
                        error,
                    });
                    return report;
                }
            }
        }

        tracing::info!(completed = report.completed.len(), "Batch finished");
        report
    }
}
