use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use semporna::application::ports::{
    JobQueue, LlmProvider, ReferenceLetterRepository,
};
use semporna::application::services::{DocumentExtractor, DocumentWorker};
use semporna::domain::{
    DocumentStatus, FileId, ProcessingRequest, ReferenceLetter, StorageKey, UserId,
};
use semporna::infrastructure::llm::ScriptedLlmProvider;
use semporna::infrastructure::persistence::repositories::{
    InMemoryReferenceLetterRepository, InMemoryResumeRepository,
};
use semporna::infrastructure::queue::{
    InMemoryJobQueue, JobState, JobStore, WorkerPool, WorkerPoolConfig,
};
use semporna::infrastructure::storage::InMemoryBlobStore;

struct Harness {
    blob_store: Arc<InMemoryBlobStore>,
    provider: Arc<ScriptedLlmProvider>,
    letter_repository: Arc<InMemoryReferenceLetterRepository>,
    queue: Arc<InMemoryJobQueue>,
    worker: Arc<DocumentWorker>,
}

fn harness(max_attempts: i32) -> Harness {
    let blob_store = Arc::new(InMemoryBlobStore::new());
    let provider = Arc::new(ScriptedLlmProvider::new());
    let resume_repository = Arc::new(InMemoryResumeRepository::new());
    let letter_repository = Arc::new(InMemoryReferenceLetterRepository::new());
    let queue = Arc::new(InMemoryJobQueue::new(max_attempts, Duration::ZERO));

    let extractor = DocumentExtractor::new(
        Arc::clone(&provider) as Arc<dyn LlmProvider>,
        "claude-sonnet-4-5",
        4096,
    );
    let worker = Arc::new(DocumentWorker::new(
        blob_store.clone(),
        extractor,
        resume_repository,
        letter_repository.clone(),
        10 * 1024 * 1024,
    ));

    Harness {
        blob_store,
        provider,
        letter_repository,
        queue,
        worker,
    }
}

fn pool_config() -> WorkerPoolConfig {
    WorkerPoolConfig {
        concurrency: 2,
        poll_interval: Duration::from_millis(10),
    }
}

async fn wait_for_state(
    queue: &InMemoryJobQueue,
    job_id: semporna::domain::JobId,
    wanted: JobState,
) {
    for _ in 0..300 {
        if queue.state_of(job_id).await == Some(wanted) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job never reached {wanted:?}");
}

#[tokio::test]
async fn given_processable_job_when_pool_runs_then_job_completes_and_entity_is_updated() {
    let harness = harness(3);
    let letter = ReferenceLetter::new(UserId::new(), FileId::new());
    harness.letter_repository.insert(letter.clone()).await;

    let request = ProcessingRequest::reference_letter(
        StorageKey::from_raw("letters/x.pdf"),
        letter.file_id,
        "application/pdf",
        letter.user_id,
        letter.id,
    );
    harness
        .blob_store
        .put(&request.storage_key, b"%PDF-1.4 letter")
        .await
        .unwrap();
    harness.provider.push_text("Jane Doe recommends the candidate warmly.");
    harness.provider.push_json(json!({
        "author": { "name": "Jane Doe", "relationship": "manager" },
        "testimonials": ["A pleasure to work with."]
    }));

    let job_id = harness.queue.insert(&request).await.unwrap();

    let handle = WorkerPool::new(
        harness.queue.clone() as Arc<dyn JobStore>,
        harness.worker.clone(),
        pool_config(),
    )
    .start();

    wait_for_state(&harness.queue, job_id, JobState::Completed).await;
    handle.shutdown().await;

    let stored = harness
        .letter_repository
        .get_by_id(letter.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, DocumentStatus::Completed);
}

#[tokio::test]
async fn given_persistent_transient_failure_when_attempts_exhaust_then_terminal_failure_is_recorded()
{
    // Two delivery attempts, both hitting a missing blob: the queue gives up
    // and the final attempt's error is persisted on the entity.
    let harness = harness(2);
    let letter = ReferenceLetter::new(UserId::new(), FileId::new());
    harness.letter_repository.insert(letter.clone()).await;

    let request = ProcessingRequest::reference_letter(
        StorageKey::from_raw("letters/missing.pdf"),
        letter.file_id,
        "application/pdf",
        letter.user_id,
        letter.id,
    );
    let job_id = harness.queue.insert(&request).await.unwrap();

    let handle = WorkerPool::new(
        harness.queue.clone() as Arc<dyn JobStore>,
        harness.worker.clone(),
        pool_config(),
    )
    .start();

    wait_for_state(&harness.queue, job_id, JobState::Failed).await;
    handle.shutdown().await;

    assert_eq!(harness.queue.attempts_of(job_id).await, Some(2));

    let stored = harness
        .letter_repository
        .get_by_id(letter.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, DocumentStatus::Failed);
    let message = stored.error_message.unwrap();
    assert!(message.contains("storage"), "got: {message}");
    assert!(stored.extracted_data.is_none());
    assert_eq!(harness.provider.call_count(), 0);
}

#[tokio::test]
async fn given_running_pool_when_shutting_down_then_pending_jobs_are_left_for_redelivery() {
    let harness = harness(3);

    let handle = WorkerPool::new(
        harness.queue.clone() as Arc<dyn JobStore>,
        harness.worker.clone(),
        pool_config(),
    )
    .start();
    handle.shutdown().await;

    // A job inserted after shutdown stays pending; nothing claims it.
    let letter = ReferenceLetter::new(UserId::new(), FileId::new());
    harness.letter_repository.insert(letter.clone()).await;
    let request = ProcessingRequest::reference_letter(
        StorageKey::from_raw("letters/later.pdf"),
        letter.file_id,
        "application/pdf",
        letter.user_id,
        letter.id,
    );
    let job_id = harness.queue.insert(&request).await.unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(harness.queue.state_of(job_id).await, Some(JobState::Pending));
}
