//! # px-service — Binary Entry Point
//!
//! Reads [`ServiceConfig`] from the environment, builds the accessor suite
//! and serves the API. Binds to `PX_PORT` (default 7000).

use std::net::SocketAddr;

use clap::Parser;
use px_service::config::ServiceConfig;
use px_service::AppState;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "px-service", version, about = "Payment experience service")]
struct Args {
    /// Port to listen on. Overrides `PX_PORT`.
    #[arg(long)]
    port: Option<u16>,

    /// Log output format: `text` or `json`.
    #[arg(long, env = "PX_LOG_FORMAT", default_value = "text")]
    log_format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let mut config = ServiceConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    let unconfigured = config.unconfigured_services();
    if !unconfigured.is_empty() {
        tracing::warn!(
            "Downstream services not configured: {}. Routes that need them will return 503.",
            unconfigured.join(", ")
        );
    }

    let port = config.port;
    let state = AppState::new(config).map_err(|e| {
        tracing::error!("Accessor initialization failed: {e}");
        e
    })?;
    let app = px_service::app(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("px-service listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
