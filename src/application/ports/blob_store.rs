use std::io;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::StorageKey;

/// Byte-addressable object store holding uploaded documents.
///
/// `download` distinguishes a missing object (`NotFound`) from transport
/// failures so callers can classify them separately, and refuses objects
/// larger than `max_bytes` with `TooLarge`.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(
        &self,
        key: &StorageKey,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
        content_length: Option<u64>,
    ) -> Result<u64, BlobStoreError>;

    async fn download(&self, key: &StorageKey, max_bytes: u64) -> Result<Vec<u8>, BlobStoreError>;

    async fn delete(&self, key: &StorageKey) -> Result<(), BlobStoreError>;

    async fn exists(&self, key: &StorageKey) -> Result<bool, BlobStoreError>;

    /// Time-limited URL for direct reads. Backends without request signing
    /// return [`BlobStoreError::PresigningUnsupported`].
    async fn presigned_url(
        &self,
        key: &StorageKey,
        expires_in: Duration,
    ) -> Result<String, BlobStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("object {key} is {size} bytes, exceeds the {limit} byte limit")]
    TooLarge { key: String, size: u64, limit: u64 },
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("presigned URLs not supported by the {0} backend")]
    PresigningUnsupported(&'static str),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl BlobStoreError {
    /// `TooLarge` will never succeed on retry; everything else is treated as
    /// transient by the worker.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, BlobStoreError::TooLarge { .. })
    }
}
