//! starchain HTTP server entry point.
//!
//! Parses arguments, initializes logging, seeds a fresh in-memory chain and
//! serves the REST API until Ctrl+C or SIGTERM.

mod api;
mod cli;
mod error;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use starchain_chain::{ChainStore, Ed25519Verifier, SystemClock};
use std::sync::Arc;
use tokio::signal;

use api::{create_router, AppState};
use cli::ServerCli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ServerCli::parse();
    logging::init_logging(
        "starchain_server=info,starchain_chain=info,tower_http=info",
        cli.log_format,
    );

    let config = cli.chain_config();
    tracing::info!(
        bind = %cli.bind,
        challenge_window = config.challenge_window_secs,
        domain_tag = %config.domain_tag,
        "starting starchain-server"
    );

    let store = ChainStore::new(config, Arc::new(Ed25519Verifier), Arc::new(SystemClock))
        .context("failed to seed genesis block")?;
    if let Some(genesis) = store.head() {
        tracing::info!(hash = %genesis.hash, "genesis block created");
    }

    let router = create_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    tracing::info!(addr = %cli.bind, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    tracing::info!("starchain-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
