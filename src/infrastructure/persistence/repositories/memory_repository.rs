use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::{
    ReferenceLetterRepository, RepositoryError, ResumeRepository,
};
use crate::domain::{ReferenceLetter, ReferenceLetterId, Resume, ResumeId};

/// Stateful in-memory repository for tests and scaffold runs.
pub struct InMemoryResumeRepository {
    rows: RwLock<HashMap<Uuid, Resume>>,
}

impl InMemoryResumeRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, resume: Resume) {
        self.rows
            .write()
            .await
            .insert(resume.id.as_uuid(), resume);
    }
}

impl Default for InMemoryResumeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ResumeRepository for InMemoryResumeRepository {
    async fn get_by_id(&self, id: ResumeId) -> Result<Option<Resume>, RepositoryError> {
        Ok(self.rows.read().await.get(&id.as_uuid()).cloned())
    }

    async fn update(&self, resume: &Resume) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&resume.id.as_uuid()) {
            return Err(RepositoryError::QueryFailed(format!(
                "no resume row {}",
                resume.id.as_uuid()
            )));
        }
        rows.insert(resume.id.as_uuid(), resume.clone());
        Ok(())
    }
}

pub struct InMemoryReferenceLetterRepository {
    rows: RwLock<HashMap<Uuid, ReferenceLetter>>,
}

impl InMemoryReferenceLetterRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, letter: ReferenceLetter) {
        self.rows
            .write()
            .await
            .insert(letter.id.as_uuid(), letter);
    }
}

impl Default for InMemoryReferenceLetterRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ReferenceLetterRepository for InMemoryReferenceLetterRepository {
    async fn get_by_id(
        &self,
        id: ReferenceLetterId,
    ) -> Result<Option<ReferenceLetter>, RepositoryError> {
        Ok(self.rows.read().await.get(&id.as_uuid()).cloned())
    }

    async fn update(&self, letter: &ReferenceLetter) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&letter.id.as_uuid()) {
            return Err(RepositoryError::QueryFailed(format!(
                "no reference letter row {}",
                letter.id.as_uuid()
            )));
        }
        rows.insert(letter.id.as_uuid(), letter.clone());
        Ok(())
    }
}
