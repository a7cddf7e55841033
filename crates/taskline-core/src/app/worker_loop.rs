//! WorkerLoop - タスク実行ループ
//!
//! # フロー
//! 1. DeliveryQueue::pop() で task を受け取る
//! 2. TaskProcessor で処理（既定は固定時間の sleep）
//! 3. TaskStore::update_status(id, Completed)
//! 4. 結果をログに残して次の pop へ
//!
//! 1 件ずつ処理するので、完了順 = queue に入った順

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::processor::{ProcessError, TaskProcessor};
use super::retry::RetryPolicy;
use crate::domain::{Task, TaskId, TaskStatus};
use crate::observability::{WorkerCounts, WorkerStats};
use crate::ports::{DeliveryQueue, StoreError, TaskStore};

/// Why a task could not be finished.
#[derive(Debug, Clone, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Processing(#[from] ProcessError),
}

/// Result of one processing step.
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// Status written as completed.
    Completed,
    /// The status write failed in a way that may succeed later.
    Retryable(StoreError),
    /// Nothing to gain from trying again.
    Fatal(WorkerError),
}

impl ProcessOutcome {
    fn from_update(result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => ProcessOutcome::Completed,
            Err(err) if err.is_transient() => ProcessOutcome::Retryable(err),
            Err(err) => ProcessOutcome::Fatal(err.into()),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ProcessOutcome::Completed)
    }
}

/// The single background worker, not yet running.
///
/// Built by [`AppBuilder`](super::AppBuilder); call [`Worker::spawn`] from
/// inside a tokio runtime.
pub struct Worker {
    queue: Arc<dyn DeliveryQueue>,
    store: Arc<dyn TaskStore>,
    processor: Arc<dyn TaskProcessor>,
    retry: RetryPolicy,
    stats: Arc<WorkerStats>,
}

impl Worker {
    pub fn new(
        queue: Arc<dyn DeliveryQueue>,
        store: Arc<dyn TaskStore>,
        processor: Arc<dyn TaskProcessor>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            queue,
            store,
            processor,
            retry,
            stats: Arc::new(WorkerStats::default()),
        }
    }

    /// Start the loop on the current runtime.
    pub fn spawn(self) -> WorkerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let stats = Arc::clone(&self.stats);
        let join = tokio::spawn(self.run(shutdown_rx));
        WorkerHandle {
            shutdown_tx,
            join,
            stats,
        }
    }

    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(max_attempts = self.retry.max_attempts, "worker started");
        loop {
            // shutdown が来ていたら抜ける
            if *shutdown_rx.borrow() {
                break;
            }

            // pop は待つ可能性があるので select で shutdown と競合させる
            let task = tokio::select! {
                changed = shutdown_rx.changed() => {
                    // sender が drop されたら止まる
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                task = self.queue.pop() => task,
            };

            let Some(task) = task else {
                info!("delivery queue closed");
                break;
            };

            let outcome = self.process_task(&task, &mut shutdown_rx).await;
            self.report(&task, &outcome);
        }

        // 止まった後の push は Closed で返す（intake を永久に待たせない）
        self.queue.close().await;
        info!("worker stopped");
    }

    /// Process one task: run the processor once, then write the status,
    /// retrying the write while the policy allows.
    async fn process_task(
        &self,
        task: &Task,
        shutdown_rx: &mut watch::Receiver<bool>,
    ) -> ProcessOutcome {
        info!(task_id = %task.id, title = %task.title, "processing task");

        if let Err(err) = self.processor.process(task).await {
            return ProcessOutcome::Fatal(err.into());
        }

        let mut attempt = 1;
        loop {
            let outcome = self.complete(task.id).await;
            let ProcessOutcome::Retryable(err) = &outcome else {
                return outcome;
            };
            if !self.retry.allows_retry(attempt) {
                return outcome;
            }

            let delay = self.retry.next_delay(attempt);
            warn!(task_id = %task.id, attempt, ?delay, error = %err, "status update failed, retrying");
            self.stats.record_retry();

            // backoff 中に shutdown が来たら諦める（in-flight の処理自体は終わっている）
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown_rx.changed() => return outcome,
            }
            attempt += 1;
        }
    }

    async fn complete(&self, id: TaskId) -> ProcessOutcome {
        ProcessOutcome::from_update(self.store.update_status(id, TaskStatus::Completed).await)
    }

    fn report(&self, task: &Task, outcome: &ProcessOutcome) {
        match outcome {
            ProcessOutcome::Completed => {
                self.stats.record_completed();
                info!(task_id = %task.id, title = %task.title, "task processed");
            }
            ProcessOutcome::Retryable(err) => {
                self.stats.record_failed();
                error!(task_id = %task.id, error = %err, "giving up on status update, task stays pending");
            }
            ProcessOutcome::Fatal(err) => {
                self.stats.record_failed();
                error!(task_id = %task.id, error = %err, "task failed, task stays pending");
            }
        }
    }
}

/// Handle to the running worker.
/// - `shutdown_tx` を drop するとワーカーが止まる
/// - `shutdown_and_join()` で終了を待てる
pub struct WorkerHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
    stats: Arc<WorkerStats>,
}

impl WorkerHandle {
    /// Request shutdown.
    /// This does not cancel a task that is already being processed; the
    /// worker just stops taking new ones.
    pub fn request_shutdown(&self) {
        // ignore send error: the worker may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    /// Shutdown and wait for the worker to exit.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        if let Err(e) = self.join.await {
            error!(error = %e, "worker task panicked");
        }
    }

    pub fn counts(&self) -> WorkerCounts {
        self.stats.snapshot()
    }
}
