use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::{DocumentStatus, FileId, ReferenceLetterId, UserId};

/// A processed reference letter entity. Same status/payload invariants as
/// [`super::Resume`]; the two lifecycles advance independently.
#[derive(Debug, Clone)]
pub struct ReferenceLetter {
    pub id: ReferenceLetterId,
    pub user_id: UserId,
    pub file_id: FileId,
    pub status: DocumentStatus,
    pub extracted_data: Option<JsonValue>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReferenceLetter {
    pub fn new(user_id: UserId, file_id: FileId) -> Self {
        let now = Utc::now();
        Self {
            id: ReferenceLetterId::new(),
            user_id,
            file_id,
            status: DocumentStatus::Pending,
            extracted_data: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn begin_processing(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = DocumentStatus::Processing;
        self.updated_at = Utc::now();
        true
    }

    pub fn complete(&mut self, data: JsonValue) {
        self.status = DocumentStatus::Completed;
        self.extracted_data = Some(data);
        self.error_message = None;
        self.updated_at = Utc::now();
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = DocumentStatus::Failed;
        self.extracted_data = None;
        self.error_message = Some(message.into());
        self.updated_at = Utc::now();
    }
}
