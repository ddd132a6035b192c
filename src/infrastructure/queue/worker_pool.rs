use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::application::services::DocumentWorker;

use super::{ClaimedJob, FailDisposition, JobStore};

#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// Number of jobs processed concurrently.
    pub concurrency: usize,
    /// Sleep between polls when the queue is empty.
    pub poll_interval: Duration,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Pulls claimed jobs from the queue and drives [`DocumentWorker`] over
/// them. Each slot runs one job to completion before claiming the next;
/// the pool only sleeps when the queue is empty.
pub struct WorkerPool {
    queue: Arc<dyn JobStore>,
    worker: Arc<DocumentWorker>,
    config: WorkerPoolConfig,
}

/// Handle for stopping a running pool. Shutdown is graceful: in-flight jobs
/// finish, no new claims are made, and a canceled attempt never leaves a
/// partial entity write behind because all entity writes are single full-row
/// updates.
pub struct WorkerPoolHandle {
    shutdown_tx: mpsc::Sender<()>,
    done_rx: mpsc::Receiver<()>,
}

impl WorkerPoolHandle {
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.done_rx.recv().await;
    }
}

impl WorkerPool {
    pub fn new(
        queue: Arc<dyn JobStore>,
        worker: Arc<DocumentWorker>,
        config: WorkerPoolConfig,
    ) -> Self {
        Self {
            queue,
            worker,
            config,
        }
    }

    pub fn start(self) -> WorkerPoolHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let (done_tx, done_rx) = mpsc::channel(1);

        tokio::spawn(async move {
            self.run(shutdown_rx).await;
            let _ = done_tx.send(()).await;
        });

        WorkerPoolHandle {
            shutdown_tx,
            done_rx,
        }
    }

    #[instrument(skip(self, shutdown_rx), fields(concurrency = self.config.concurrency))]
    async fn run(&self, mut shutdown_rx: mpsc::Receiver<()>) {
        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "Worker pool started"
        );

        loop {
            if shutdown_rx.try_recv().is_ok() {
                info!("Worker pool received shutdown signal");
                break;
            }

            let mut tasks = JoinSet::new();
            let mut claimed = 0;

            for _ in 0..self.config.concurrency {
                match self.queue.claim_next().await {
                    Ok(Some(job)) => {
                        claimed += 1;
                        let queue = Arc::clone(&self.queue);
                        let worker = Arc::clone(&self.worker);
                        tasks.spawn(async move {
                            execute_claimed(queue, worker, job).await;
                        });
                    }
                    Ok(None) => break,
                    Err(e) => {
                        error!(error = %e, "Failed to claim job");
                        break;
                    }
                }
            }

            if claimed == 0 {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Worker pool received shutdown signal");
                        break;
                    }
                    _ = sleep(self.config.poll_interval) => {}
                }
            } else {
                debug!(claimed, "Processing job batch");
                while let Some(result) = tasks.join_next().await {
                    if let Err(e) = result {
                        error!(error = ?e, "Job task panicked");
                    }
                }
            }
        }

        info!("Worker pool stopped");
    }
}

async fn execute_claimed(queue: Arc<dyn JobStore>, worker: Arc<DocumentWorker>, job: ClaimedJob) {
    let span = tracing::info_span!(
        "processing_job",
        job_id = %job.id.as_uuid(),
        attempt = job.attempts,
        max_attempts = job.max_attempts,
    );
    run_job(queue, worker, job).instrument(span).await;
}

async fn run_job(queue: Arc<dyn JobStore>, worker: Arc<DocumentWorker>, job: ClaimedJob) {
    match worker.process(&job.request).await {
        Ok(outcome) => {
            debug!(?outcome, "Job attempt finished");
            if let Err(e) = queue.complete(job.id).await {
                error!(error = %e, "Failed to mark job completed");
            }
        }
        Err(transient) => {
            let message = transient.to_string();
            match queue.fail(job.id, &message).await {
                Ok(FailDisposition::Retrying) => {
                    warn!(error = %message, "Job attempt failed, queue will redeliver");
                }
                Ok(FailDisposition::Exhausted) => {
                    // Retry budget spent: the final attempt's error becomes
                    // the entity's terminal failed state.
                    warn!(error = %message, "Job attempts exhausted, recording terminal failure");
                    if let Err(e) = worker.mark_failed(&job.request, &message).await {
                        error!(error = %e, "Failed to persist terminal failure");
                    }
                }
                Err(e) => {
                    error!(error = %e, "Failed to record job failure");
                }
            }
        }
    }
}
