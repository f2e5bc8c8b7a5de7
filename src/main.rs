use anyhow::Result;
use clap::Parser;
use edge_router::cli::Cli;
use edge_router::config::UpstreamConfig;
use edge_router::server::spawn_edge_server;
use edge_router::stats::{RequestMessage, RequestStats};
use log::info;
use std::time::Duration;
use tokio::signal;
use tokio::sync::{mpsc, watch};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let cli = Cli::parse();

    let upstreams = UpstreamConfig::new(&cli.frontend_origin, &cli.backend_origin)?;
    info!(
        "Frontend origin: {}, backend origin: {}",
        upstreams.frontend, upstreams.backend
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (stats_tx, stats_rx) = mpsc::channel(100);

    let shutdown_task = tokio::spawn(handle_shutdown_signal(shutdown_tx.clone()));
    let stats_task = tokio::spawn(collect_stats(stats_rx, shutdown_rx.clone()));

    spawn_edge_server(&cli.listen_addr, upstreams, shutdown_rx, stats_tx).await?;

    shutdown_task.await?;
    stats_task.abort();

    Ok(())
}

pub async fn handle_shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    // Wait for a shutdown signal (e.g., Ctrl+C)
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");

    // Send the shutdown notification to all receivers
    let _ = shutdown_tx.send(true);
}

async fn collect_stats(
    mut stats_rx: mpsc::Receiver<RequestMessage>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut stats = RequestStats::new();
    let mut interval = tokio::time::interval(Duration::from_secs(30));

    loop {
        tokio::select! {
            Some(message) = stats_rx.recv() => {
                stats.handle_message(message);
            }
            _ = interval.tick() => {
                stats.print_stats();
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
}
