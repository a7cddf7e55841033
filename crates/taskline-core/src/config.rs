//! Service configuration.
//!
//! Plain values with defaults; the binary fills them from flags and
//! environment variables, tests build them directly.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::app::{RetryPolicy, SimulatedDelay};

pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_DATABASE_PATH: &str = "./tasks.db";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,

    /// SQLite database file.
    pub database_path: PathBuf,

    /// How long the worker "works" on each task.
    pub processing_delay: Duration,

    /// Tasks that may wait in the queue before intake blocks.
    pub queue_capacity: usize,

    /// Retry policy for the worker's status update.
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            processing_delay: SimulatedDelay::DEFAULT,
            queue_capacity: 1,
            retry: RetryPolicy::no_retry(),
        }
    }
}
