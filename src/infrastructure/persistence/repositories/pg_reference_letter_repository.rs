use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{ReferenceLetterRepository, RepositoryError};
use crate::domain::{DocumentStatus, FileId, ReferenceLetter, ReferenceLetterId, UserId};

pub struct PgReferenceLetterRepository {
    pool: PgPool,
}

impl PgReferenceLetterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceLetterRepository for PgReferenceLetterRepository {
    #[instrument(skip(self), fields(reference_letter_id = %id.as_uuid()))]
    async fn get_by_id(
        &self,
        id: ReferenceLetterId,
    ) -> Result<Option<ReferenceLetter>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, user_id, file_id, status, extracted_data, error_message, \
                    created_at, updated_at \
             FROM reference_letters \
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status_str: String = row
            .try_get("status")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let status = status_str
            .parse::<DocumentStatus>()
            .map_err(RepositoryError::QueryFailed)?;

        Ok(Some(ReferenceLetter {
            id: ReferenceLetterId::from_uuid(
                row.try_get("id")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            ),
            user_id: UserId::from_uuid(
                row.try_get("user_id")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            ),
            file_id: FileId::from_uuid(
                row.try_get("file_id")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            ),
            status,
            extracted_data: row
                .try_get("extracted_data")
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            error_message: row
                .try_get("error_message")
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            updated_at: row
                .try_get("updated_at")
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
        }))
    }

    #[instrument(skip(self, letter), fields(reference_letter_id = %letter.id.as_uuid(), status = %letter.status))]
    async fn update(&self, letter: &ReferenceLetter) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE reference_letters \
             SET user_id = $1, file_id = $2, status = $3, extracted_data = $4, \
                 error_message = $5, updated_at = $6 \
             WHERE id = $7",
        )
        .bind(letter.user_id.as_uuid())
        .bind(letter.file_id.as_uuid())
        .bind(letter.status.as_str())
        .bind(&letter.extracted_data)
        .bind(&letter.error_message)
        .bind(letter.updated_at)
        .bind(letter.id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}
