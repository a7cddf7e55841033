//! InMemoryDeliveryQueue - プロセス内の配送キュー
//!
//! # 実装詳細
//! - tokio の bounded mpsc で FIFO と backpressure を得る
//! - 受信側は Mutex で包んで `&self` から pop できるようにする
//! - close は送信側を drop し、受信側も close する
//!   （満杯で待っている push も Closed で返る。キュー済みのタスクは pop できる）

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::domain::Task;
use crate::ports::{DeliveryQueue, QueueError};

/// Bounded in-process queue.
///
/// Capacity 1 gives the single-slot hand-off: a second `push` waits until
/// the worker has taken the first task.
///
/// # 使用例
/// ```ignore
/// let queue = InMemoryDeliveryQueue::new(1);
/// queue.push(task).await?;
/// let next = queue.pop().await;
/// ```
pub struct InMemoryDeliveryQueue {
    /// `None` after close
    tx: Mutex<Option<mpsc::Sender<Task>>>,
    rx: Mutex<mpsc::Receiver<Task>>,
    capacity: usize,
}

impl InMemoryDeliveryQueue {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx: Mutex::new(Some(tx)),
            rx: Mutex::new(rx),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl DeliveryQueue for InMemoryDeliveryQueue {
    async fn push(&self, task: Task) -> Result<(), QueueError> {
        // sender を clone してからロックを離す（満杯で待つ間に他の push を止めない）
        let tx = {
            let guard = self.tx.lock().await;
            guard.as_ref().cloned().ok_or(QueueError::Closed)?
        };
        tx.send(task).await.map_err(|_| QueueError::Closed)
    }

    async fn pop(&self) -> Option<Task> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    async fn close(&self) {
        // 先に sender を落とす: pop 中の受信側がいれば None で抜けてロックを離す
        self.tx.lock().await.take();
        self.rx.lock().await.close();
    }
}
