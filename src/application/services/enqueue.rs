use std::sync::Arc;

use tracing::instrument;

use crate::application::ports::{EnqueueError, JobQueue};
use crate::domain::{
    FileId, JobId, ProcessingRequest, ReferenceLetterId, ResumeId, StorageKey, UserId,
};

/// The three enqueue operations upstream callers use after an upload:
/// resume-only, reference-letter-only, and unified (both extractions over
/// one downloaded file, avoiding duplicate downloads).
pub struct DocumentEnqueuer {
    queue: Arc<dyn JobQueue>,
}

impl DocumentEnqueuer {
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }

    #[instrument(skip(self), fields(resume_id = %resume_id.as_uuid()))]
    pub async fn enqueue_resume(
        &self,
        storage_key: StorageKey,
        file_id: FileId,
        content_type: &str,
        user_id: UserId,
        resume_id: ResumeId,
    ) -> Result<JobId, EnqueueError> {
        let request =
            ProcessingRequest::resume(storage_key, file_id, content_type, user_id, resume_id);
        self.queue.insert(&request).await
    }

    #[instrument(skip(self), fields(reference_letter_id = %reference_letter_id.as_uuid()))]
    pub async fn enqueue_reference_letter(
        &self,
        storage_key: StorageKey,
        file_id: FileId,
        content_type: &str,
        user_id: UserId,
        reference_letter_id: ReferenceLetterId,
    ) -> Result<JobId, EnqueueError> {
        let request = ProcessingRequest::reference_letter(
            storage_key,
            file_id,
            content_type,
            user_id,
            reference_letter_id,
        );
        self.queue.insert(&request).await
    }

    /// Fails fast with [`EnqueueError::InvalidRequest`] when neither target
    /// id is given; the request never reaches a worker.
    #[instrument(skip(self))]
    pub async fn enqueue_unified(
        &self,
        storage_key: StorageKey,
        file_id: FileId,
        content_type: &str,
        user_id: UserId,
        resume_id: Option<ResumeId>,
        reference_letter_id: Option<ReferenceLetterId>,
    ) -> Result<JobId, EnqueueError> {
        let request = ProcessingRequest::unified(
            storage_key,
            file_id,
            content_type,
            user_id,
            resume_id,
            reference_letter_id,
        );
        request.validate()?;
        self.queue.insert(&request).await
    }
}
