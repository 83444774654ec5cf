//! pantry-web: volunteer frontend for pantry inventory upload and review.

use anyhow::{Context, Result};
use clap::Parser;
use pantry_logging::{default_log_dir, init_logging, LogConfig};
use pantry_security::StaticCredentials;
use pantry_web::{serve, shutdown_signal, AppState, RuntimeConfig, WebArgs};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = WebArgs::parse();

    let log_dir = if args.no_log_file {
        None
    } else {
        Some(args.log_dir.clone().unwrap_or_else(default_log_dir))
    };
    let _log_guard = init_logging(LogConfig {
        app_name: "pantry-web",
        verbose: args.verbose,
        log_dir,
    })?;

    let config = RuntimeConfig::from_args(&args).context("Invalid configuration")?;
    info!(
        environment = %config.environment,
        api_url = %config.api_url,
        request_timeout_secs = config.request_timeout.as_secs(),
        "Starting pantry-web"
    );

    let bind_addr = config.bind_addr;
    let state = AppState::new(config, Arc::new(StaticCredentials::default()))
        .context("Failed to initialize server state")?;

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    serve(listener, state, shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}
