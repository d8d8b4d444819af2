//! Fish Distribution API Server
//!
//! Looks up species occurrences on GBIF, renders them on a map and keeps a
//! dashboard of every request.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use fish_api::config::ServiceConfig;
use fish_api::server::build_router;
use fish_api::state::AppState;

/// Fish Distribution API Server
#[derive(Parser, Debug)]
#[command(name = "fish-api")]
#[command(about = "Fish distribution maps from GBIF occurrence data")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "FISH_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "FISH_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Configuration file
    #[arg(short, long, default_value = "config/fish-api.yaml", env = "FISH_CONFIG")]
    config: PathBuf,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting fish distribution API server");

    let mut config = ServiceConfig::load_from_file(&args.config)?;
    config.apply_env()?;

    let state = AppState::from_config(&config)
        .await
        .context("Failed to initialize application state")?
        .with_prometheus(prometheus_handle);

    let app = build_router(Arc::new(state));

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Fish API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
