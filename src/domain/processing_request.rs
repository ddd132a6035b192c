use serde::{Deserialize, Serialize};

use super::{FileId, ReferenceLetterId, ResumeId, StorageKey, UserId};

/// The job payload a worker receives from the queue.
///
/// At least one of `resume_id` / `reference_letter_id` must be set; a
/// request targeting neither is rejected at enqueue time and never reaches a
/// worker. A request carrying both runs resume and letter extraction over
/// the same downloaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingRequest {
    pub storage_key: StorageKey,
    pub file_id: FileId,
    pub content_type: String,
    pub user_id: UserId,
    #[serde(default)]
    pub resume_id: Option<ResumeId>,
    #[serde(default)]
    pub reference_letter_id: Option<ReferenceLetterId>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RequestValidationError {
    #[error("request targets neither a resume nor a reference letter")]
    NoTarget,
}

impl ProcessingRequest {
    pub fn resume(
        storage_key: StorageKey,
        file_id: FileId,
        content_type: impl Into<String>,
        user_id: UserId,
        resume_id: ResumeId,
    ) -> Self {
        Self {
            storage_key,
            file_id,
            content_type: content_type.into(),
            user_id,
            resume_id: Some(resume_id),
            reference_letter_id: None,
        }
    }

    pub fn reference_letter(
        storage_key: StorageKey,
        file_id: FileId,
        content_type: impl Into<String>,
        user_id: UserId,
        reference_letter_id: ReferenceLetterId,
    ) -> Self {
        Self {
            storage_key,
            file_id,
            content_type: content_type.into(),
            user_id,
            resume_id: None,
            reference_letter_id: Some(reference_letter_id),
        }
    }

    pub fn unified(
        storage_key: StorageKey,
        file_id: FileId,
        content_type: impl Into<String>,
        user_id: UserId,
        resume_id: Option<ResumeId>,
        reference_letter_id: Option<ReferenceLetterId>,
    ) -> Self {
        Self {
            storage_key,
            file_id,
            content_type: content_type.into(),
            user_id,
            resume_id,
            reference_letter_id,
        }
    }

    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.resume_id.is_none() && self.reference_letter_id.is_none() {
            return Err(RequestValidationError::NoTarget);
        }
        Ok(())
    }
}
