//! Feed gateway binary.
//!
//! ```text
//!   Browser dashboard
//!        │
//!        ▼
//!   ┌──────────────────────────── feed-gateway ─────────────────────────────┐
//!   │  /api/waze-merged ──▶ memo cache ──(miss)──▶ aggregator ──┬─▶ primary   │──▶ upstream
//!   │                                                           └─▶ secondary │──▶ upstream
//!   │  /api/proxy?url=  ──▶ allow-list ──▶ relay                              │──▶ upstream
//!   └────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use feed_gateway::config::{load_config, validate_config, ConfigError, GatewayConfig};
use feed_gateway::lifecycle;
use feed_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "feed-gateway")]
#[command(about = "Merged traffic feed gateway with allow-listed passthrough proxy", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
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
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);
    tracing::info!("feed-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
