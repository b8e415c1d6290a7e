// SPDX-License-Identifier: BUSL-1.1
//! Downstream service emulators — standalone development server.
//!
//! Serves every emulated service from one port, each under its own prefix
//! (`/pims`, `/partnersettings`, ...). Point the payment experience service
//! at it with `PX_EMULATOR_URL=http://127.0.0.1:7100`.
//!
//! State is in memory and lost on restart.

use std::net::SocketAddr;

use clap::Parser;
use px_emulators::{router, Emulators};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "px-emulators", version, about = "Downstream service emulators")]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PX_EMULATOR_PORT", default_value_t = 7100)]
    port: u16,

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

    let emulators = Emulators::new()?;
    let app = router(emulators);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("px-emulators listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
