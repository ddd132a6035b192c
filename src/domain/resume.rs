use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::{DocumentStatus, FileId, ResumeId, UserId};

/// A processed resume entity.
///
/// Invariants: `extracted_data` is set only when status is `Completed`;
/// `error_message` only when `Failed`. Status moves are applied through the
/// methods below, which keep payload and status in one value so the
/// repository writes them atomically as a full row.
#[derive(Debug, Clone)]
pub struct Resume {
    pub id: ResumeId,
    pub user_id: UserId,
    pub file_id: FileId,
    pub status: DocumentStatus,
    pub extracted_data: Option<JsonValue>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    pub fn new(user_id: UserId, file_id: FileId) -> Self {
        let now = Utc::now();
        Self {
            id: ResumeId::new(),
            user_id,
            file_id,
            status: DocumentStatus::Pending,
            extracted_data: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flip to `Processing` for a new attempt. Returns `false` without
    /// changing anything when the entity already reached a terminal status,
    /// so redelivered jobs never regress it.
    pub fn begin_processing(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = DocumentStatus::Processing;
        self.updated_at = Utc::now();
        true
    }

    /// Full replace: completed status, new payload, cleared error.
    pub fn complete(&mut self, data: JsonValue) {
        self.status = DocumentStatus::Completed;
        self.extracted_data = Some(data);
        self.error_message = None;
        self.updated_at = Utc::now();
    }

    /// Full replace: failed status, error message, cleared payload.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = DocumentStatus::Failed;
        self.extracted_data = None;
        self.error_message = Some(message.into());
        self.updated_at = Utc::now();
    }
}
