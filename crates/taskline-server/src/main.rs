use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use taskline_core::impls::SqliteTaskStore;
use taskline_core::observability::init_tracing;
use taskline_core::{App, AppBuilder, build_router};

mod cli;

use cli::Cli;

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl_c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("SIGINT received"),
        _ = terminate => warn!("SIGTERM received"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log);
    let config = cli.config();

    // (A) Store を開く
    let store = SqliteTaskStore::open(&config.database_path).with_context(|| {
        format!("could not open database {}", config.database_path.display())
    })?;

    // (B) Service と Worker を組み立てる（設定の検証もここ）
    let App { service, worker } = AppBuilder::from_config(Arc::new(store), &config)
        .build()
        .context("invalid configuration")?;
    let worker = worker.spawn();

    // (C) HTTP サーバ
    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("could not bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, db = %config.database_path.display(), "server started");

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // (D) 受付を止めてから worker を止める
    info!("shutting down worker");
    worker.shutdown_and_join().await;
    Ok(())
}
