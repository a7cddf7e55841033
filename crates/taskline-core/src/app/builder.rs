//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - 設定値は build() 時にまとめて検証
//! - 不正値があれば BuildError を返し、ワーカーは起動しない

use std::sync::Arc;
use std::time::Duration;

use super::processor::{SimulatedDelay, TaskProcessor};
use super::retry::RetryPolicy;
use super::service::TaskService;
use super::worker_loop::Worker;
use crate::config::Config;
use crate::impls::InMemoryDeliveryQueue;
use crate::ports::{Clock, DeliveryQueue, SystemClock, TaskStore};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let App { service, worker } = AppBuilder::new(store)
///     .processing_delay(Duration::from_secs(5))
///     .queue_capacity(1)
///     .build()?;
/// let handle = worker.spawn();
/// ```
pub struct AppBuilder {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    processor: Arc<dyn TaskProcessor>,
    queue_capacity: usize,
    retry: RetryPolicy,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("retry policy needs at least one attempt")]
    ZeroMaxAttempts,

    #[error("backoff multiplier must be a finite number >= 1.0, got {0}")]
    InvalidBackoffMultiplier(f64),
}

impl AppBuilder {
    /// Defaults: wall clock, 5 s simulated work, single-slot queue, no retry.
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            processor: Arc::new(SimulatedDelay::default()),
            queue_capacity: 1,
            retry: RetryPolicy::no_retry(),
        }
    }

    /// Start from the worker-related parts of `config`.
    pub fn from_config(store: Arc<dyn TaskStore>, config: &Config) -> Self {
        Self::new(store)
            .processing_delay(config.processing_delay)
            .queue_capacity(config.queue_capacity)
            .retry_policy(config.retry.clone())
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the per-task work entirely.
    pub fn processor(mut self, processor: Arc<dyn TaskProcessor>) -> Self {
        self.processor = processor;
        self
    }

    /// Shorthand for a [`SimulatedDelay`] processor.
    pub fn processing_delay(self, delay: Duration) -> Self {
        self.processor(Arc::new(SimulatedDelay::new(delay)))
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validate settings and wire the service and the (not yet running) worker
    /// around one shared queue.
    pub fn build(self) -> Result<App, BuildError> {
        if self.queue_capacity == 0 {
            return Err(BuildError::ZeroQueueCapacity);
        }
        if self.retry.max_attempts == 0 {
            return Err(BuildError::ZeroMaxAttempts);
        }
        let multiplier = self.retry.multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(BuildError::InvalidBackoffMultiplier(multiplier));
        }

        let queue: Arc<dyn DeliveryQueue> =
            Arc::new(InMemoryDeliveryQueue::new(self.queue_capacity));
        let service = TaskService::new(Arc::clone(&self.store), Arc::clone(&queue), self.clock);
        let worker = Worker::new(queue, self.store, self.processor, self.retry);

        Ok(App { service, worker })
    }
}

/// Wired application: the request-side service plus the worker to spawn.
pub struct App {
    pub service: TaskService,
    pub worker: Worker,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskStatus;
    use crate::impls::InMemoryTaskStore;
    use rstest::rstest;

    fn store() -> Arc<InMemoryTaskStore> {
        Arc::new(InMemoryTaskStore::new())
    }

    #[test]
    fn test_build_success_with_defaults() {
        assert!(AppBuilder::new(store()).build().is_ok());
    }

    #[test]
    fn test_build_rejects_zero_capacity() {
        let app = AppBuilder::new(store()).queue_capacity(0).build();
        assert!(matches!(app, Err(BuildError::ZeroQueueCapacity)));
    }

    #[test]
    fn test_build_rejects_zero_attempts() {
        let retry = RetryPolicy::exponential(0, Duration::from_secs(1), 2.0);
        let app = AppBuilder::new(store()).retry_policy(retry).build();
        assert!(matches!(app, Err(BuildError::ZeroMaxAttempts)));
    }

    #[rstest]
    #[case(0.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_build_rejects_bad_multiplier(#[case] multiplier: f64) {
        let retry = RetryPolicy::exponential(3, Duration::from_secs(1), multiplier);
        let app = AppBuilder::new(store()).retry_policy(retry).build();
        assert!(matches!(app, Err(BuildError::InvalidBackoffMultiplier(_))));
    }

    #[tokio::test]
    async fn test_built_app_processes_tasks_end_to_end() {
        let store = store();
        let App { service, worker } = AppBuilder::new(store.clone())
            .processing_delay(Duration::ZERO)
            .build()
            .unwrap();
        let handle = worker.spawn();

        let task = service.create_task("A", "B").await.unwrap();

        tokio::time::timeout(Duration::from_secs(5), async {
            while handle.counts().completed == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(store.get(task.id).await.unwrap().status, TaskStatus::Completed);
        handle.shutdown_and_join().await;
    }
}
