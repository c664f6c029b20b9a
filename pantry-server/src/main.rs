//! # Pantry server
//!
//! Usage:
//!   pantry-server
//!   pantry-server --port 8080 --model mistral
//!   OLLAMA_HOST=gpu-box:11434 pantry-server

use clap::Parser;
use pantry_core::{OllamaProvider, RecipePipeline};
use pantry_error::Result;
use pantry_server::ServerConfig;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn run(config: ServerConfig) -> Result<()> {
    let provider_config = config.provider_config();
    info!(
        backend = %provider_config.base_url,
        model = %provider_config.model,
        timeout_secs = ?provider_config.timeout_secs,
        "Configuring model backend"
    );

    let provider = OllamaProvider::new(provider_config)?;
    let app = pantry_server::router(RecipePipeline::new(Arc::new(provider)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .map_err(|e| pantry_error::Error::from(e).with_context("addr", config.bind_addr()))?;

    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();
    init_tracing(&config.log_level);

    info!("Starting pantry server...");
    if let Err(e) = run(config).await {
        error!(error = %e, "server failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
