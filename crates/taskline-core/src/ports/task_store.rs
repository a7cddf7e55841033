//! TaskStore port - タスクの正本（source of truth）
//!
//! # 利用者
//! - intake: insert
//! - worker: update_status
//! - listing: list_all
//!
//! ロックは実装側が持つ（呼び出し側で Mutex に包まない）

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewTask, Task, TaskId, TaskStatus};

/// Result type for task store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable record of tasks.
///
/// # 設計原則
/// - Pure persistence: no lifecycle policy lives here.
/// - Every call is independent; no transaction spans two calls.
/// - Safe for concurrent use by request handlers and the worker.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a new task and returns the identity assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] on any write or connection fault.
    async fn insert(&self, task: &NewTask) -> StoreResult<TaskId>;

    /// Persists a new status for an existing task.
    ///
    /// The transition itself is not validated; that is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no row has this id.
    async fn update_status(&self, id: TaskId, status: TaskStatus) -> StoreResult<()>;

    /// Returns every task in implementation-defined order.
    async fn list_all(&self) -> StoreResult<Vec<Task>>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Whether trying the same call again could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Persistence(_))
    }
}
