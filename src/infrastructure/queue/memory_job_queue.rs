use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::application::ports::{EnqueueError, JobQueue};
use crate::domain::{JobId, ProcessingRequest};

use super::{ClaimedJob, FailDisposition, JobStore, QueueError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug)]
struct StoredJob {
    id: JobId,
    request: ProcessingRequest,
    state: JobState,
    attempts: i32,
    available_at: Instant,
    error: Option<String>,
}

/// In-process queue with the same claim/retry accounting as the durable
/// adapter. Backs tests and scaffold runs; provides no durability.
pub struct InMemoryJobQueue {
    jobs: Mutex<Vec<StoredJob>>,
    max_attempts: i32,
    retry_backoff: Duration,
}

impl InMemoryJobQueue {
    pub fn new(max_attempts: i32, retry_backoff: Duration) -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            max_attempts,
            retry_backoff,
        }
    }

    pub async fn state_of(&self, id: JobId) -> Option<JobState> {
        self.jobs
            .lock()
            .await
            .iter()
            .find(|job| job.id == id)
            .map(|job| job.state)
    }

    pub async fn attempts_of(&self, id: JobId) -> Option<i32> {
        self.jobs
            .lock()
            .await
            .iter()
            .find(|job| job.id == id)
            .map(|job| job.attempts)
    }

    pub async fn error_of(&self, id: JobId) -> Option<String> {
        self.jobs
            .lock()
            .await
            .iter()
            .find(|job| job.id == id)
            .and_then(|job| job.error.clone())
    }
}

#[async_trait::async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn insert(&self, request: &ProcessingRequest) -> Result<JobId, EnqueueError> {
        request.validate()?;

        let id = JobId::new();
        self.jobs.lock().await.push(StoredJob {
            id,
            request: request.clone(),
            state: JobState::Pending,
            attempts: 0,
            available_at: Instant::now(),
            error: None,
        });
        Ok(id)
    }
}

#[async_trait::async_trait]
impl JobStore for InMemoryJobQueue {
    async fn claim_next(&self) -> Result<Option<ClaimedJob>, QueueError> {
        let now = Instant::now();
        let mut jobs = self.jobs.lock().await;

        let Some(job) = jobs
            .iter_mut()
            .find(|job| job.state == JobState::Pending && job.available_at <= now)
        else {
            return Ok(None);
        };

        job.state = JobState::Running;
        job.attempts += 1;

        Ok(Some(ClaimedJob {
            id: job.id,
            request: job.request.clone(),
            attempts: job.attempts,
            max_attempts: self.max_attempts,
        }))
    }

    async fn complete(&self, id: JobId) -> Result<(), QueueError> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .iter_mut()
            .find(|job| job.id == id)
            .ok_or_else(|| QueueError::Query(format!("unknown job {}", id.as_uuid())))?;

        job.state = JobState::Completed;
        job.error = None;
        Ok(())
    }

    async fn fail(&self, id: JobId, error: &str) -> Result<FailDisposition, QueueError> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .iter_mut()
            .find(|job| job.id == id)
            .ok_or_else(|| QueueError::Query(format!("unknown job {}", id.as_uuid())))?;

        job.error = Some(error.to_string());

        if job.attempts < self.max_attempts {
            let exponent = job.attempts.saturating_sub(1).clamp(0, 16) as u32;
            job.state = JobState::Pending;
            job.available_at =
                Instant::now() + self.retry_backoff.saturating_mul(2u32.saturating_pow(exponent));
            Ok(FailDisposition::Retrying)
        } else {
            job.state = JobState::Failed;
            Ok(FailDisposition::Exhausted)
        }
    }
}
