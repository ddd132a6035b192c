use std::time::Duration;

use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{EnqueueError, JobQueue};
use crate::domain::{JobId, ProcessingRequest};

use super::{ClaimedJob, FailDisposition, QueueError};

/// Durable at-least-once queue backed by a Postgres table.
///
/// Claims use `FOR UPDATE SKIP LOCKED` so concurrent worker slots never
/// double-claim a row; at-least-once still holds because a crashed worker's
/// running job is re-queued by the next `fail`/redelivery cycle. Retried
/// jobs back off exponentially from `retry_backoff`.
pub struct PgJobQueue {
    pool: PgPool,
    max_attempts: i32,
    retry_backoff: Duration,
}

impl PgJobQueue {
    pub fn new(pool: PgPool, max_attempts: i32, retry_backoff: Duration) -> Self {
        Self {
            pool,
            max_attempts,
            retry_backoff,
        }
    }

    fn backoff_for(&self, attempts: i32) -> Duration {
        let exponent = attempts.saturating_sub(1).clamp(0, 16) as u32;
        self.retry_backoff.saturating_mul(2u32.saturating_pow(exponent))
    }
}

#[async_trait::async_trait]
impl JobQueue for PgJobQueue {
    #[instrument(skip(self, request), fields(storage_key = %request.storage_key))]
    async fn insert(&self, request: &ProcessingRequest) -> Result<JobId, EnqueueError> {
        request.validate()?;

        let job_id = JobId::new();
        let payload = serde_json::to_value(request)
            .map_err(|e| EnqueueError::Unavailable(format!("payload encoding: {e}")))?;
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO processing_jobs \
                 (id, payload, status, attempts, max_attempts, available_at, created_at) \
             VALUES ($1, $2, 'pending', 0, $3, $4, $4)",
        )
        .bind(job_id.as_uuid())
        .bind(&payload)
        .bind(self.max_attempts)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| EnqueueError::Unavailable(e.to_string()))?;

        tracing::debug!(job_id = %job_id.as_uuid(), "Processing job enqueued");
        Ok(job_id)
    }
}

#[async_trait::async_trait]
impl super::JobStore for PgJobQueue {
    async fn claim_next(&self) -> Result<Option<ClaimedJob>, QueueError> {
        let now = Utc::now();

        let row = sqlx::query(
            "UPDATE processing_jobs \
             SET status = 'running', attempts = attempts + 1, started_at = $1 \
             WHERE id = ( \
                 SELECT id FROM processing_jobs \
                 WHERE status = 'pending' AND available_at <= $1 \
                 ORDER BY created_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING id, payload, attempts, max_attempts",
        )
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| QueueError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: uuid::Uuid = row
            .try_get("id")
            .map_err(|e| QueueError::Query(e.to_string()))?;
        let payload: serde_json::Value = row
            .try_get("payload")
            .map_err(|e| QueueError::Query(e.to_string()))?;
        let attempts: i32 = row
            .try_get("attempts")
            .map_err(|e| QueueError::Query(e.to_string()))?;
        let max_attempts: i32 = row
            .try_get("max_attempts")
            .map_err(|e| QueueError::Query(e.to_string()))?;

        let request: ProcessingRequest =
            serde_json::from_value(payload).map_err(|e| QueueError::Payload(e.to_string()))?;

        Ok(Some(ClaimedJob {
            id: JobId::from_uuid(id),
            request,
            attempts,
            max_attempts,
        }))
    }

    async fn complete(&self, id: JobId) -> Result<(), QueueError> {
        sqlx::query(
            "UPDATE processing_jobs \
             SET status = 'completed', completed_at = $1, error_message = NULL \
             WHERE id = $2",
        )
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| QueueError::Query(e.to_string()))?;

        Ok(())
    }

    async fn fail(&self, id: JobId, error: &str) -> Result<FailDisposition, QueueError> {
        let row = sqlx::query("SELECT attempts, max_attempts FROM processing_jobs WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| QueueError::Query(e.to_string()))?;

        let attempts: i32 = row
            .try_get("attempts")
            .map_err(|e| QueueError::Query(e.to_string()))?;
        let max_attempts: i32 = row
            .try_get("max_attempts")
            .map_err(|e| QueueError::Query(e.to_string()))?;

        if attempts < max_attempts {
            let available_at = Utc::now()
                + chrono::Duration::from_std(self.backoff_for(attempts))
                    .unwrap_or_else(|_| chrono::Duration::seconds(60));

            sqlx::query(
                "UPDATE processing_jobs \
                 SET status = 'pending', error_message = $1, available_at = $2, started_at = NULL \
                 WHERE id = $3",
            )
            .bind(error)
            .bind(available_at)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| QueueError::Query(e.to_string()))?;

            Ok(FailDisposition::Retrying)
        } else {
            sqlx::query(
                "UPDATE processing_jobs \
                 SET status = 'failed', error_message = $1, completed_at = $2 \
                 WHERE id = $3",
            )
            .bind(error)
            .bind(Utc::now())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| QueueError::Query(e.to_string()))?;

            Ok(FailDisposition::Exhausted)
        }
    }
}
