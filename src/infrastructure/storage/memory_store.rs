use std::io;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{BlobStore, BlobStoreError};
use crate::domain::StorageKey;

use super::local_store::map_get_error;

/// Fully functional in-memory store for tests and scaffold runs.
pub struct InMemoryBlobStore {
    inner: InMemory,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            inner: InMemory::new(),
        }
    }

    /// Test convenience: seed an object without building a stream.
    pub async fn put(&self, key: &StorageKey, data: &[u8]) -> Result<(), BlobStoreError> {
        let store_path = StorePath::from(key.as_str());
        self.inner
            .put(&store_path, PutPayload::from(data.to_vec()))
            .await
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;
        Ok(())
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(
        &self,
        key: &StorageKey,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
        _content_length: Option<u64>,
    ) -> Result<u64, BlobStoreError> {
        let mut buffer = Vec::new();
        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk.map_err(BlobStoreError::Io)?);
        }
        let total = buffer.len() as u64;

        let store_path = StorePath::from(key.as_str());
        self.inner
            .put(&store_path, PutPayload::from(buffer))
            .await
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;

        Ok(total)
    }

    async fn download(&self, key: &StorageKey, max_bytes: u64) -> Result<Vec<u8>, BlobStoreError> {
        let store_path = StorePath::from(key.as_str());
        let result = self
            .inner
            .get(&store_path)
            .await
            .map_err(|e| map_get_error(key, e))?;

        let size = result.meta.size as u64;
        if size > max_bytes {
            return Err(BlobStoreError::TooLarge {
                key: key.as_str().to_string(),
                size,
                limit: max_bytes,
            });
        }

        let bytes = result
            .bytes()
            .await
            .map_err(|e| BlobStoreError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), BlobStoreError> {
        let store_path = StorePath::from(key.as_str());
        self.inner
            .delete(&store_path)
            .await
            .map_err(|e| BlobStoreError::DeleteFailed(e.to_string()))
    }

    async fn exists(&self, key: &StorageKey) -> Result<bool, BlobStoreError> {
        let store_path = StorePath::from(key.as_str());
        match self.inner.head(&store_path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(BlobStoreError::DownloadFailed(e.to_string())),
        }
    }

    async fn presigned_url(
        &self,
        _key: &StorageKey,
        _expires_in: Duration,
    ) -> Result<String, BlobStoreError> {
        Err(BlobStoreError::PresigningUnsupported("in-memory"))
    }
}
