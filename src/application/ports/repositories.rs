use async_trait::async_trait;

use crate::domain::{ReferenceLetter, ReferenceLetterId, Resume, ResumeId};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Per-entity persistence. `update` is a full-row write including status,
/// extracted data and error message; the worker is the only component that
/// mutates those fields during a processing attempt.
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn get_by_id(&self, id: ResumeId) -> Result<Option<Resume>, RepositoryError>;

    async fn update(&self, resume: &Resume) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ReferenceLetterRepository: Send + Sync {
    async fn get_by_id(
        &self,
        id: ReferenceLetterId,
    ) -> Result<Option<ReferenceLetter>, RepositoryError>;

    async fn update(&self, letter: &ReferenceLetter) -> Result<(), RepositoryError>;
}
