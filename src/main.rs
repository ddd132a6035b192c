use std::sync::Arc;
use std::time::Duration;

use semporna::application::services::{DocumentExtractor, DocumentWorker};
use semporna::config::Settings;
use semporna::infrastructure::llm::AnthropicClient;
use semporna::infrastructure::observability::{init_tracing, TracingConfig};
use semporna::infrastructure::persistence::repositories::{
    PgReferenceLetterRepository, PgResumeRepository,
};
use semporna::infrastructure::persistence::create_pool;
use semporna::infrastructure::queue::{PgJobQueue, WorkerPool, WorkerPoolConfig};
use semporna::infrastructure::storage::BlobStoreFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(TracingConfig::default());

    let settings = Settings::from_env()?;

    let pool = create_pool(&settings.database).await?;
    let resume_repository = Arc::new(PgResumeRepository::new(pool.clone()));
    let letter_repository = Arc::new(PgReferenceLetterRepository::new(pool.clone()));

    let blob_store = BlobStoreFactory::create(&settings.storage)?;

    let provider = Arc::new(match &settings.llm.base_url {
        Some(base_url) => {
            AnthropicClient::with_base_url(settings.llm.api_key.clone(), base_url.clone())
        }
        None => AnthropicClient::new(settings.llm.api_key.clone()),
    });
    let extractor = DocumentExtractor::new(
        provider,
        settings.llm.model.clone(),
        settings.llm.max_tokens,
    );

    let worker = Arc::new(DocumentWorker::new(
        blob_store,
        extractor,
        resume_repository,
        letter_repository,
        settings.limits.max_download_bytes,
    ));

    let queue = Arc::new(PgJobQueue::new(
        pool,
        settings.queue.max_attempts,
        Duration::from_millis(settings.queue.retry_backoff_ms),
    ));

    let pool_config = WorkerPoolConfig {
        concurrency: settings.queue.concurrency,
        poll_interval: Duration::from_millis(settings.queue.poll_interval_ms),
    };
    let handle = WorkerPool::new(queue, worker, pool_config).start();

    tracing::info!(environment = %settings.environment, "Document processing workers running");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, draining in-flight jobs");
    handle.shutdown().await;

    Ok(())
}
