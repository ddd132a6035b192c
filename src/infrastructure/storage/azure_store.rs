use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::path::Path as StorePath;
use object_store::signer::Signer;
use object_store::{MultipartUpload, ObjectStore, PutPayload};

use crate::application::ports::{BlobStore, BlobStoreError};
use crate::domain::StorageKey;

use super::local_store::map_get_error;

pub struct AzureBlobStore {
    inner: Arc<MicrosoftAzure>,
}

impl AzureBlobStore {
    pub fn new(account: &str, access_key: &str, container: &str) -> Result<Self, BlobStoreError> {
        let store = MicrosoftAzureBuilder::new()
            .with_account(account)
            .with_access_key(access_key)
            .with_container_name(container)
            .build()
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(store),
        })
    }
}

#[async_trait::async_trait]
impl BlobStore for AzureBlobStore {
    async fn upload(
        &self,
        key: &StorageKey,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
        _content_length: Option<u64>,
    ) -> Result<u64, BlobStoreError> {
        let store_path = StorePath::from(key.as_str());
        let mut upload = self
            .inner
            .put_multipart(&store_path)
            .await
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;

        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    let _ = upload.abort().await;
                    return Err(BlobStoreError::Io(e));
                }
            };
            total_bytes += bytes.len() as u64;
            if let Err(e) = upload.put_part(PutPayload::from(bytes)).await {
                let _ = upload.abort().await;
                return Err(BlobStoreError::UploadFailed(e.to_string()));
            }
        }

        upload
            .complete()
            .await
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;

        Ok(total_bytes)
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
        key: &StorageKey,
        expires_in: Duration,
    ) -> Result<String, BlobStoreError> {
        let store_path = StorePath::from(key.as_str());
        let url = self
            .inner
            .signed_url(http::Method::GET, &store_path, expires_in)
            .await
            .map_err(|e| BlobStoreError::DownloadFailed(e.to_string()))?;
        Ok(url.to_string())
    }
}
