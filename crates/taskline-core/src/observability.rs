//! Logging setup and worker counters.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"info"`)
/// is used. Calling it twice is harmless, the second call is ignored.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    // ignore error: a subscriber may already be installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Point-in-time view of what the worker has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerCounts {
    /// Tasks whose status was written as completed.
    pub completed: u64,
    /// Tasks left pending because processing or the status write failed.
    pub failed: u64,
    /// Status writes that were tried again.
    pub retried: u64,
}

/// Counters shared between the worker and whoever holds its handle.
#[derive(Debug, Default)]
pub struct WorkerStats {
    completed: AtomicU64,
    failed: AtomicU64,
    retried: AtomicU64,
}

impl WorkerStats {
    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retried.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> WorkerCounts {
        WorkerCounts {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            retried: self.retried.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_events() {
        let stats = WorkerStats::default();
        stats.record_completed();
        stats.record_completed();
        stats.record_failed();
        stats.record_retry();

        assert_eq!(
            stats.snapshot(),
            WorkerCounts {
                completed: 2,
                failed: 1,
                retried: 1,
            }
        );
    }

    #[test]
    fn init_tracing_twice_does_not_panic() {
        init_tracing("debug");
        init_tracing("info");
    }
}
