//! lyra-server - Lyrics analysis service
//!
//! Resolves the lyrics page of the listener's current track, serves the
//! extracted lyrics, and streams AI line-by-line analysis and song summaries.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lyra_common::config::{CliOverrides, ServiceConfig, TomlConfig};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lyra_server::{build_router, AppState};

/// Command-line arguments for lyra-server
#[derive(Parser, Debug)]
#[command(name = "lyra-server")]
#[command(about = "Lyrics resolution and streaming analysis service")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(short, long, env = "LYRA_BIND")]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "LYRA_PORT")]
    port: Option<u16>,

    /// Path to config.toml
    #[arg(short, long, env = "LYRA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "LYRA_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load config file")?;
    let cli = CliOverrides {
        bind: args.bind,
        port: args.port,
        log_level: args.log_level,
    };
    let config = ServiceConfig::resolve(&cli, &toml_config);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "lyra_server={level},lyra_common={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting lyra-server v{}",
        env!("CARGO_PKG_VERSION")
    );

    config.validate().context("Invalid configuration")?;

    let state = AppState::from_config(&config).context("Failed to build upstream clients")?;
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("lyra-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
