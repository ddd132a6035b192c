mod memory_job_queue;
mod pg_job_queue;
mod worker_pool;

pub use memory_job_queue::{InMemoryJobQueue, JobState};
pub use pg_job_queue::PgJobQueue;
pub use worker_pool::{WorkerPool, WorkerPoolConfig, WorkerPoolHandle};

use crate::domain::{JobId, ProcessingRequest};

/// Claim-side contract the worker pool drives. Queue adapters implement
/// this next to the application-facing [`crate::application::ports::JobQueue`]
/// insert operation.
#[async_trait::async_trait]
pub trait JobStore: Send + Sync {
    /// Claim the next deliverable job, marking it running and bumping its
    /// attempt counter. Returns `None` when the queue is empty.
    async fn claim_next(&self) -> Result<Option<ClaimedJob>, QueueError>;

    async fn complete(&self, id: JobId) -> Result<(), QueueError>;

    /// Record a failed attempt. Re-queues with backoff while attempts
    /// remain, otherwise marks the job terminally failed and reports
    /// [`FailDisposition::Exhausted`].
    async fn fail(&self, id: JobId, error: &str) -> Result<FailDisposition, QueueError>;
}

/// A job handed to a worker slot, with its delivery accounting.
#[derive(Debug, Clone)]
pub struct ClaimedJob {
    pub id: JobId,
    pub request: ProcessingRequest,
    pub attempts: i32,
    pub max_attempts: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailDisposition {
    /// Attempt budget remains; the job will be redelivered after backoff.
    Retrying,
    /// Budget exhausted; the job is terminally failed.
    Exhausted,
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue query failed: {0}")]
    Query(String),
    #[error("malformed job payload: {0}")]
    Payload(String),
}
