//! ExApp shim server.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────┐
//!                   │                    EXAPP SHIM                     │
//!   Host (AppAPI)   │  ┌────────────┐   ┌──────────────┐                │
//!   ────────────────┼─▶│ request id │──▶│  host auth   │──┐             │
//!                   │  │  + trace   │   │  + locale    │  │             │
//!                   │  └────────────┘   └──────────────┘  │             │
//!                   │        ┌────────────────────────────┼──────────┐  │
//!                   │        ▼                            ▼          ▼  │
//!                   │  ┌───────────┐              ┌──────────┐ ┌──────┐ │
//!                   │  │ lifecycle │              │ /api/*   │ │ /*   │ │
//!                   │  │ heartbeat │              │ backend  │ │static│ │
//!                   │  │ init      │              │ proxy    │ │files │ │
//!                   │  │ enabled   │              └────┬─────┘ └──────┘ │
//!                   │  └─────┬─────┘                   │                │
//!                   └────────┼─────────────────────────┼────────────────┘
//!                            ▼                         ▼
//!                     Host SDK (OCS)          Backend 127.0.0.1:8288
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use exapp_shim::config::load_config;
use exapp_shim::http::HttpServer;
use exapp_shim::i18n::{Localizer, APP_DISPLAY_NAME};
use exapp_shim::lifecycle::{signals, Shutdown};
use exapp_shim::observability::init_logging;

#[derive(Parser)]
#[command(name = "exapp-shim")]
#[command(about = "Host-facing shim for an external Nextcloud application", long_about = None)]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, env = "EXAPP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    init_logging(&config.observability);

    let banner = Localizer::load(&config.localization, &config.app.id).default_translator();
    tracing::info!(
        app = %banner.tr_or(APP_DISPLAY_NAME, &config.app.display_name),
        version = %config.app.version,
        "exapp-shim v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.address,
        nextcloud_url = %config.host.nextcloud_url,
        models = config.models.len(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
