//! CLI argument parsing for taskline-server

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use taskline_core::Config;
use taskline_core::app::RetryPolicy;

#[derive(Parser, Debug)]
#[command(name = "taskline-server")]
#[command(author, version, about = "Task tracking service with a background worker", long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "TASKLINE_LISTEN", default_value = "0.0.0.0:8001")]
    pub listen: SocketAddr,

    /// SQLite database file
    #[arg(long, env = "TASKLINE_DATABASE", default_value = "./tasks.db")]
    pub database: PathBuf,

    /// Simulated processing time per task, in milliseconds
    #[arg(long, env = "TASKLINE_PROCESSING_DELAY_MS", default_value_t = 5000)]
    pub processing_delay_ms: u64,

    /// Tasks that can wait for the worker before intake blocks
    #[arg(long, env = "TASKLINE_QUEUE_CAPACITY", default_value_t = 1)]
    pub queue_capacity: usize,

    /// Attempts for the worker's status update (1 = never retry)
    #[arg(long, env = "TASKLINE_MAX_ATTEMPTS", default_value_t = 1)]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds
    #[arg(long, env = "TASKLINE_RETRY_BASE_MS", default_value_t = 1000)]
    pub retry_base_ms: u64,

    /// Backoff multiplier between retries
    #[arg(long, env = "TASKLINE_RETRY_MULTIPLIER", default_value_t = 2.0)]
    pub retry_multiplier: f64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "TASKLINE_LOG", default_value = "info")]
    pub log: String,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            listen_addr: self.listen,
            database_path: self.database.clone(),
            processing_delay: Duration::from_millis(self.processing_delay_ms),
            queue_capacity: self.queue_capacity,
            retry: RetryPolicy::exponential(
                self.max_attempts,
                Duration::from_millis(self.retry_base_ms),
                self.retry_multiplier,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_config() {
        let cli = Cli::parse_from(["taskline-server"]);
        let config = cli.config();
        let defaults = Config::default();

        assert_eq!(config.listen_addr, defaults.listen_addr);
        assert_eq!(config.database_path, defaults.database_path);
        assert_eq!(config.processing_delay, defaults.processing_delay);
        assert_eq!(config.queue_capacity, defaults.queue_capacity);
        assert_eq!(config.retry.max_attempts, defaults.retry.max_attempts);
        assert_eq!(cli.log, "info");
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "taskline-server",
            "--listen",
            "127.0.0.1:9000",
            "--database",
            "/tmp/t.db",
            "--processing-delay-ms",
            "0",
            "--queue-capacity",
            "8",
            "--max-attempts",
            "3",
        ]);
        let config = cli.config();

        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.database_path, PathBuf::from("/tmp/t.db"));
        assert_eq!(config.processing_delay, Duration::ZERO);
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
