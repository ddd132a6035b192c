use std::sync::Arc;

use tracing::instrument;

use crate::application::ports::{
    BlobStore, BlobStoreError, ReferenceLetterRepository, RepositoryError, ResumeRepository,
};
use crate::domain::{MediaType, ProcessingRequest, ReferenceLetter, Resume};

use super::document_extractor::{DocumentExtractor, ExtractionError};
use super::validator::{validate_letter_data, validate_resume_data};

/// Orchestrates one processing attempt: resolve targets, flip them to
/// processing, download the document, extract and validate, persist.
///
/// Invoked under at-least-once delivery, so every step tolerates re-running
/// from scratch: status writes never regress a terminal state and the final
/// persistence is an unconditional full replace derived only from the source
/// file, so duplicate deliveries converge.
pub struct DocumentWorker {
    blob_store: Arc<dyn BlobStore>,
    extractor: DocumentExtractor,
    resume_repository: Arc<dyn ResumeRepository>,
    letter_repository: Arc<dyn ReferenceLetterRepository>,
    max_download_bytes: u64,
}

/// Attempt result reported back to the queue. All variants consume the job;
/// `Failed` means terminal failure state was written to at least one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Every surviving target persisted extracted data.
    Completed,
    /// At least one target was terminally failed with an error message.
    Failed,
    /// No target entity exists any more; the job's goal is moot.
    Skipped,
}

/// Failure classified as transient. Returned to the queue for backoff
/// redelivery without writing any terminal entity state.
#[derive(Debug, thiserror::Error)]
pub enum TransientError {
    #[error("storage: {0}")]
    Storage(BlobStoreError),
    #[error("extraction: {0}")]
    Extraction(ExtractionError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}

impl DocumentWorker {
    pub fn new(
        blob_store: Arc<dyn BlobStore>,
        extractor: DocumentExtractor,
        resume_repository: Arc<dyn ResumeRepository>,
        letter_repository: Arc<dyn ReferenceLetterRepository>,
        max_download_bytes: u64,
    ) -> Self {
        Self {
            blob_store,
            extractor,
            resume_repository,
            letter_repository,
            max_download_bytes,
        }
    }

    #[instrument(
        skip(self, request),
        fields(
            storage_key = %request.storage_key,
            resume_id = ?request.resume_id.map(|id| id.as_uuid()),
            reference_letter_id = ?request.reference_letter_id.map(|id| id.as_uuid()),
        )
    )]
    pub async fn process(
        &self,
        request: &ProcessingRequest,
    ) -> Result<ProcessOutcome, TransientError> {
        let mut resume = match request.resume_id {
            Some(id) => self.resume_repository.get_by_id(id).await?,
            None => None,
        };
        let mut letter = match request.reference_letter_id {
            Some(id) => self.letter_repository.get_by_id(id).await?,
            None => None,
        };

        if resume.is_none() && letter.is_none() {
            tracing::info!("No target entity exists, treating job as done");
            return Ok(ProcessOutcome::Skipped);
        }

        if let Some(r) = resume.as_mut() {
            if r.begin_processing() {
                self.resume_repository.update(r).await?;
            }
        }
        if let Some(l) = letter.as_mut() {
            if l.begin_processing() {
                self.letter_repository.update(l).await?;
            }
        }

        let document = match self
            .blob_store
            .download(&request.storage_key, self.max_download_bytes)
            .await
        {
            Ok(bytes) => bytes,
            Err(e) if e.is_retryable() => return Err(TransientError::Storage(e)),
            Err(e) => {
                return self
                    .fail_all(resume, letter, &format!("document download rejected: {e}"))
                    .await;
            }
        };

        let media_type = match MediaType::from_mime(&request.content_type) {
            Some(media_type) => media_type,
            None => {
                return self
                    .fail_all(
                        resume,
                        letter,
                        &format!("unsupported media type: {}", request.content_type),
                    )
                    .await;
            }
        };

        // One text extraction per job; a unified request feeds both
        // structured extractors from the same text.
        let text = match self.extractor.extract_text(&document, media_type).await {
            Ok(text) => text,
            Err(e) if e.is_retryable() => return Err(TransientError::Extraction(e)),
            Err(e) => {
                return self
                    .fail_all(resume, letter, &format!("text extraction failed: {e}"))
                    .await;
            }
        };

        let mut any_failed = false;

        if let Some(mut r) = resume {
            any_failed |= !self.process_resume(&mut r, &text).await?;
        }
        if let Some(mut l) = letter {
            any_failed |= !self.process_letter(&mut l, &text).await?;
        }

        if any_failed {
            Ok(ProcessOutcome::Failed)
        } else {
            Ok(ProcessOutcome::Completed)
        }
    }

    /// Persist terminal failure for every target that still exists. Used by
    /// the worker pool when the queue's attempt budget is exhausted, so the
    /// final attempt's error becomes the entity's terminal state.
    pub async fn mark_failed(
        &self,
        request: &ProcessingRequest,
        message: &str,
    ) -> Result<(), RepositoryError> {
        if let Some(id) = request.resume_id {
            if let Some(mut resume) = self.resume_repository.get_by_id(id).await? {
                resume.fail(message);
                self.resume_repository.update(&resume).await?;
            }
        }
        if let Some(id) = request.reference_letter_id {
            if let Some(mut letter) = self.letter_repository.get_by_id(id).await? {
                letter.fail(message);
                self.letter_repository.update(&letter).await?;
            }
        }
        Ok(())
    }

    /// Returns `Ok(true)` when the resume completed, `Ok(false)` when it was
    /// terminally failed.
    async fn process_resume(
        &self,
        resume: &mut Resume,
        text: &str,
    ) -> Result<bool, TransientError> {
        let data = match self.extractor.extract_resume_data(text).await {
            Ok(data) => data,
            Err(e) if e.is_retryable() => return Err(TransientError::Extraction(e)),
            Err(e) => {
                resume.fail(format!("resume extraction failed: {e}"));
                self.resume_repository.update(resume).await?;
                tracing::warn!(resume_id = %resume.id.as_uuid(), error = %e, "Resume extraction failed");
                return Ok(false);
            }
        };

        if let Err(e) = validate_resume_data(&data) {
            resume.fail(format!("validation failed: {e}"));
            self.resume_repository.update(resume).await?;
            tracing::warn!(resume_id = %resume.id.as_uuid(), error = %e, "Resume validation failed");
            return Ok(false);
        }

        let payload = match serde_json::to_value(&data) {
            Ok(payload) => payload,
            Err(e) => {
                resume.fail(format!("could not encode extracted data: {e}"));
                self.resume_repository.update(resume).await?;
                return Ok(false);
            }
        };

        resume.complete(payload);
        self.resume_repository.update(resume).await?;
        tracing::info!(resume_id = %resume.id.as_uuid(), "Resume extraction completed");
        Ok(true)
    }

    async fn process_letter(
        &self,
        letter: &mut ReferenceLetter,
        text: &str,
    ) -> Result<bool, TransientError> {
        let data = match self.extractor.extract_letter_data(text).await {
            Ok(data) => data,
            Err(e) if e.is_retryable() => return Err(TransientError::Extraction(e)),
            Err(e) => {
                letter.fail(format!("letter extraction failed: {e}"));
                self.letter_repository.update(letter).await?;
                tracing::warn!(reference_letter_id = %letter.id.as_uuid(), error = %e, "Letter extraction failed");
                return Ok(false);
            }
        };

        if let Err(e) = validate_letter_data(&data) {
            letter.fail(format!("validation failed: {e}"));
            self.letter_repository.update(letter).await?;
            tracing::warn!(reference_letter_id = %letter.id.as_uuid(), error = %e, "Letter validation failed");
            return Ok(false);
        }

        let payload = match serde_json::to_value(&data) {
            Ok(payload) => payload,
            Err(e) => {
                letter.fail(format!("could not encode extracted data: {e}"));
                self.letter_repository.update(letter).await?;
                return Ok(false);
            }
        };

        letter.complete(payload);
        self.letter_repository.update(letter).await?;
        tracing::info!(reference_letter_id = %letter.id.as_uuid(), "Letter extraction completed");
        Ok(true)
    }

    async fn fail_all(
        &self,
        resume: Option<Resume>,
        letter: Option<ReferenceLetter>,
        message: &str,
    ) -> Result<ProcessOutcome, TransientError> {
        if let Some(mut r) = resume {
            r.fail(message);
            self.resume_repository.update(&r).await?;
        }
        if let Some(mut l) = letter {
            l.fail(message);
            self.letter_repository.update(&l).await?;
        }
        tracing::warn!(message, "Job failed terminally");
        Ok(ProcessOutcome::Failed)
    }
}
