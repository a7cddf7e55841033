//! TaskService - intake と listing
//!
//! # intake の順序
//! 1. 検証（title が空なら弾く）
//! 2. TaskStore::insert（行ができてから queue に載せる）
//! 3. DeliveryQueue::push（満杯なら空くまで待つ）
//!
//! insert に失敗したタスクは queue に載らない

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::domain::{NewTask, Task, ValidationError};
use crate::ports::{Clock, DeliveryQueue, QueueError, StoreError, TaskStore};

/// Errors returned by [`TaskService::create_task`].
#[derive(Debug, Clone, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    /// The row was written but the worker is no longer accepting tasks.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Request-side entry point shared by all HTTP handlers.
///
/// Cheap to clone; every clone talks to the same store, queue and clock.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    queue: Arc<dyn DeliveryQueue>,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(
        store: Arc<dyn TaskStore>,
        queue: Arc<dyn DeliveryQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, queue, clock }
    }

    /// Accept a new task: stamp it pending at `now`, persist it, hand it to
    /// the worker.
    ///
    /// Waits while the queue is full.
    pub async fn create_task(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Task, IntakeError> {
        let new_task = NewTask::new(title, description, self.clock.now())?;

        let id = self.store.insert(&new_task).await.inspect_err(|e| {
            error!(error = %e, "failed to persist task");
        })?;
        let task = Task::from_new(id, new_task);

        self.queue.push(task.clone()).await.inspect_err(|e| {
            warn!(task_id = %id, error = %e, "task persisted but not enqueued");
        })?;
        debug!(task_id = %id, title = %task.title, "task enqueued");

        Ok(task)
    }

    /// Current state of every task.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.store.list_all().await.inspect_err(|e| {
            error!(error = %e, "failed to list tasks");
        })
    }
}
