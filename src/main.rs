//! Prerender proxy.
//!
//! Sits in front of a web application and serves pre-rendered HTML to
//! search-engine crawlers.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                 PRERENDER PROXY                  │
//!                      │                                                  │
//!   Client Request     │  ┌────────┐   ┌────────────┐   crawler          │
//!   ───────────────────┼─▶│  http  │──▶│  matching  │──────────┐         │
//!                      │  │ server │   │ classifier │          ▼         │
//!                      │  └────────┘   └─────┬──────┘   ┌────────────┐   │     Render
//!                      │                     │ other    │ prerender  │◀──┼──── Service
//!                      │                     ▼          │ pipeline   │   │
//!                      │              ┌────────────┐    │ pre → fetch│   │
//!                      │              │  upstream  │    │   → post   │   │
//!                      │              │  handler   │    └────────────┘   │
//!                      │              └─────┬──────┘                     │
//!                      └────────────────────┼─────────────────────────────┘
//!                                           ▼
//!                                      Application
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use prerender_proxy::config::{load_config, ProxyConfig};
use prerender_proxy::observability::{logging, metrics};
use prerender_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "prerender-proxy")]
#[command(about = "Serve pre-rendered pages to search-engine crawlers", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);

    tracing::info!("prerender-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        render_service = %config.prerender.service_url,
        token = config.prerender.token.is_some(),
        whitelist = config.prerender.whitelist.len(),
        blacklist = config.prerender.blacklist.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
