//! ADS Bridge - mock acquisition endpoint for the strip-chart client

mod cli;
mod config;
mod routes;

use anyhow::{Context, Result};
use bridge_simulation::PacketAssembler;
use clap::Parser;
use cli::Cli;
use config::ServerConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_thread_names(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = ServerConfig::from_cli(&cli)?;
    let assembler = Arc::new(PacketAssembler::from_config(&config.simulation)?);

    info!("--- ADS Bridge (mock acquisition server) starting ---");
    info!(
        mode = %assembler.mode(),
        channels = assembler.channel_count(),
        sampling_rate = assembler.sampling_rate(),
        batch_size = assembler.batch_size(),
        "Signal source configured"
    );
    if assembler.is_offline() {
        info!("No channel catalog: every poll answers 204 No Content");
    }
    info!("Endpoint: http://{}{}", config.bind_addr, routes::SIGNAL_PATH);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("server failed to start on {}", config.bind_addr))?;

    axum::serve(listener, routes::router(assembler))
        .await
        .context("server terminated")?;

    Ok(())
}
