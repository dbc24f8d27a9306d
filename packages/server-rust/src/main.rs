//! `abacusd` — the abacus HTTP server binary.
//!
//! Builds the standard module group once at startup, binds the configured
//! address, and serves until interrupted.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use abacus_server::{NetworkConfig, NetworkModule};

/// Exact-arithmetic function dispatch server.
#[derive(Parser, Debug)]
#[command(name = "abacusd", about = "Exact-arithmetic function dispatch server")]
struct Cli {
    /// Bind address.
    #[arg(long, default_value = "0.0.0.0", env = "ABACUS_HOST")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000, env = "ABACUS_PORT")]
    port: u16,

    /// Log filter when `RUST_LOG` is unset (e.g. `info`, `abacus_core=debug`).
    #[arg(long, default_value = "info", env = "ABACUS_LOG")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log)),
        )
        .init();

    let group = Arc::new(abacus_core::standard_group());
    info!(functions = group.len(), "module group assembled");

    let config = NetworkConfig {
        host: cli.host,
        port: cli.port,
        ..NetworkConfig::default()
    };

    let mut module = NetworkModule::new(config, group);
    let port = module.start().await?;
    info!(port, "abacusd listening");

    module
        .serve(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
}
