use crate::domain::{JobId, ProcessingRequest, RequestValidationError};

/// Durable queue accepting processing jobs for at-least-once delivery.
///
/// Claim, retry and backoff mechanics live behind the adapter; enqueue
/// callers only see `insert`. The same job may reach a worker more than
/// once, so consumers must be idempotent.
#[async_trait::async_trait]
pub trait JobQueue: Send + Sync {
    async fn insert(&self, request: &ProcessingRequest) -> Result<JobId, EnqueueError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EnqueueError {
    #[error(transparent)]
    InvalidRequest(#[from] RequestValidationError),
    #[error("queue unavailable: {0}")]
    Unavailable(String),
}
