//! Background job queue.
//!
//! Request handlers enqueue jobs and return immediately with a
//! `pending`/`generating` row; a worker task spawned at startup drains the
//! queue and runs each job on its own task. The owning row's status/progress
//! columns are the only externally observable contract.

use std::sync::Arc;

use quento_storage::PgStorage;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::analysis_service::run_analysis;
use crate::strategy_service::run_strategy_generation;

/// Unit of background work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    RunAnalysis(Uuid),
    GenerateStrategy(Uuid),
}

/// Handle for enqueueing jobs; cheap to clone.
#[derive(Debug, Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<Job>,
}

impl JobQueue {
    /// Enqueue a job. A closed worker is logged, not propagated: the row
    /// stays `pending` and the caller's response is unaffected.
    pub fn enqueue(&self, job: Job) {
        if self.tx.send(job).is_err() {
            tracing::error!(?job, "job worker is gone, job dropped");
        }
    }
}

/// Spawn the worker loop and return the queue handle.
///
/// Each job runs on its own task so one slow analysis does not delay the
/// queue. Jobs run to completion or failure; there is no cancellation.
#[must_use]
pub fn start_job_worker(storage: Arc<PgStorage>) -> JobQueue {
    let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            let storage = Arc::clone(&storage);
            tokio::spawn(async move {
                match job {
                    Job::RunAnalysis(id) => run_analysis(&storage, id).await,
                    Job::GenerateStrategy(id) => run_strategy_generation(&storage, id).await,
                }
            });
        }
        tracing::info!("job worker stopped");
    });
    JobQueue { tx }
}
