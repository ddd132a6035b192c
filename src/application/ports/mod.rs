mod blob_store;
mod job_queue;
mod llm_provider;
mod repositories;

pub use blob_store::{BlobStore, BlobStoreError};
pub use job_queue::{EnqueueError, JobQueue};
pub use llm_provider::{
    LlmProvider, LlmRequest, LlmResponse, ProviderError, ProviderErrorCode,
};
pub use repositories::{ReferenceLetterRepository, RepositoryError, ResumeRepository};
