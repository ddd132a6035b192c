use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{FileId, UserId};

/// Location of an uploaded object in the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(user_id: &UserId, file_id: &FileId, filename: &str) -> Self {
        Self(format!(
            "{}/{}/{}",
            user_id.as_uuid(),
            file_id.as_uuid(),
            filename
        ))
    }

    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
