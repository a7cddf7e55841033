//! DeliveryQueue port - intake から worker への受け渡し
//!
//! # 前提
//! - 載るのは永続化済みのタスクだけ
//! - bounded: 満杯なら push は空くまで待つ（捨てない・拒否しない）
//! - close 後の push は QueueError::Closed

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Task;

/// FIFO hand-off between intake and the worker.
///
/// # 設計原則
/// - Only persisted tasks go in (push after insert, never before).
/// - Single consumer; `pop` order equals `push` order.
/// - No timeouts on either side.
#[async_trait]
pub trait DeliveryQueue: Send + Sync {
    /// Hand a task to the worker, waiting while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] once the consumer side has been closed.
    async fn push(&self, task: Task) -> Result<(), QueueError>;

    /// Wait for the next task. `None` means closed and drained.
    async fn pop(&self) -> Option<Task>;

    /// Stop accepting pushes. Tasks already queued can still be popped.
    async fn close(&self);
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("delivery queue is closed")]
    Closed,
}
