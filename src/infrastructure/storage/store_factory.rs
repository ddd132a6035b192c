use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{BlobStore, BlobStoreError};
use crate::config::{StorageProviderSetting, StorageSettings};

use super::azure_store::AzureBlobStore;
use super::local_store::LocalBlobStore;

pub struct BlobStoreFactory;

impl BlobStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn BlobStore>, BlobStoreError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                let store = LocalBlobStore::new(path)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Azure => {
                let account = settings
                    .azure_account
                    .as_deref()
                    .ok_or_else(|| BlobStoreError::UploadFailed("azure_account required".into()))?;
                let key = settings.azure_access_key.as_deref().ok_or_else(|| {
                    BlobStoreError::UploadFailed("azure_access_key required".into())
                })?;
                let container = settings.azure_container.as_deref().ok_or_else(|| {
                    BlobStoreError::UploadFailed("azure_container required".into())
                })?;
                let store = AzureBlobStore::new(account, key, container)?;
                Ok(Arc::new(store))
            }
        }
    }
}
