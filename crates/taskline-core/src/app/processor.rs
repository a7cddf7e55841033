//! TaskProcessor - worker が 1 件ごとに行う「処理」の差し替え口
//!
//! # 実装詳細
//! - 既定の SimulatedDelay は固定時間待つだけ（実処理はしない）
//! - trait にしてあるので、テストでは待ち時間 0 にできる

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Task;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("processing failed: {0}")]
pub struct ProcessError(pub String);

/// Work performed on a task before it is marked completed.
#[async_trait]
pub trait TaskProcessor: Send + Sync {
    async fn process(&self, task: &Task) -> Result<(), ProcessError>;
}

/// Stands in for real work by sleeping.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedDelay {
    duration: Duration,
}

impl SimulatedDelay {
    pub const DEFAULT: Duration = Duration::from_secs(5);

    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// No wait at all (tests).
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for SimulatedDelay {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

#[async_trait]
impl TaskProcessor for SimulatedDelay {
    async fn process(&self, _task: &Task) -> Result<(), ProcessError> {
        if !self.duration.is_zero() {
            tokio::time::sleep(self.duration).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTask, TaskId};
    use chrono::Utc;

    fn task() -> Task {
        Task::from_new(TaskId::new(1), NewTask::new("t", "", Utc::now()).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_delay_waits_for_its_duration() {
        let processor = SimulatedDelay::new(Duration::from_secs(5));
        let start = tokio::time::Instant::now();

        processor.process(&task()).await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn instant_processor_returns_immediately() {
        let processor = SimulatedDelay::instant();
        let start = std::time::Instant::now();
        processor.process(&task()).await.unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn default_is_five_seconds() {
        assert_eq!(SimulatedDelay::default().duration(), Duration::from_secs(5));
    }
}
