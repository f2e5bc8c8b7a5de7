use crate::config::UpstreamConfig;
use crate::server::proxy::EdgeState;
use crate::stats::RequestMessage;
use anyhow::Result;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};

pub mod proxy;

/// Binds the listen address and serves the edge router until shutdown.
pub async fn spawn_edge_server(
    listen_addr: &str,
    upstreams: UpstreamConfig,
    shutdown_rx: watch::Receiver<bool>,
    stats_tx: mpsc::Sender<RequestMessage>,
) -> Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!("Edge router listening on {}", listen_addr);

    run_edge_server(listener, upstreams, shutdown_rx, stats_tx).await
}

/// Serves on an already-bound listener. Split out so tests can bind an
/// ephemeral port and learn it before the server starts.
pub async fn run_edge_server(
    listener: TcpListener,
    upstreams: UpstreamConfig,
    mut shutdown_rx: watch::Receiver<bool>,
    stats_tx: mpsc::Sender<RequestMessage>,
) -> Result<()> {
    let state = Arc::new(EdgeState::new(upstreams, stats_tx)?);

    // Every path goes through the one proxy handler; the router itself
    // exposes no routes of its own.
    let app = axum::Router::new()
        .fallback(proxy::handle)
        .with_state(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while shutdown_rx.changed().await.is_ok() {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
            info!("Shutdown signal received. Draining edge router connections...");
        })
        .await?;

    Ok(())
}
