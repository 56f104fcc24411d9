//! `tripmatchd`: the TripMatch server binary.
//!
//! Usage:
//!   tripmatchd -c <context-name-or-path> [--listen <addr>] [--data-dir <dir>] [--seed-dir <dir>]
//!
//! The context name resolves to `/etc/tripmatch/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tracing::info;

use config::ServerConfig;

/// TripMatch server.
#[derive(Parser, Debug)]
#[command(name = "tripmatchd", about = "TripMatch server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Overrides `storage.data_dir` from the config file.
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Seed directory (default: `{data_dir}/seed`).
    #[arg(long = "seed-dir")]
    seed_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let mut server_config = ServerConfig::load(&config_path)?;
    if let Some(dir) = &cli.data_dir {
        server_config.storage.data_dir = dir.display().to_string();
    }

    bootstrap::verify_config(&server_config)?;

    let data_dir = PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = tripmatch_core::ServiceConfig {
        data_dir: Some(data_dir),
        seed_dir: cli.seed_dir.clone(),
        listen: cli.listen.clone(),
        ..Default::default()
    };

    let stores = bootstrap::open_stores(&core_config)?;
    let app = bootstrap::build_app(&server_config, &stores)?;

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("TripMatch server listening on {}", core_config.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
