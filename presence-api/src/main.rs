//! presence-api - Presence analyzer HTTP service
//!
//! Serves per-weekday presence reports computed from an attendance CSV and
//! a user directory XML file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use presence_common::config::{AppConfig, ConfigOverrides};
use presence_common::PresenceAnalyzer;
use presence_api::{build_router, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "presence-api", version, about = "Presence analyzer HTTP service")]
struct Cli {
    /// TOML config file (defaults to the platform config directory)
    #[arg(long, env = "PRESENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Attendance CSV file
    #[arg(long)]
    data_csv: Option<PathBuf>,

    /// User directory XML file
    #[arg(long)]
    users_xml: Option<PathBuf>,

    /// Cache lifetime of parsed data, in seconds
    #[arg(long)]
    cache_ttl: Option<i64>,

    /// Listen address
    #[arg(long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        Self {
            config_file: cli.config,
            data_csv: cli.data_csv,
            users_xml: cli.users_xml,
            cache_ttl_secs: cli.cache_ttl,
            bind: cli.bind,
            log_level: cli.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let overrides = ConfigOverrides::from(Cli::parse());
    let config = AppConfig::resolve(&overrides).context("Failed to resolve configuration")?;

    let level: tracing::Level = config
        .log_level
        .parse()
        .with_context(|| format!("Invalid log level: {}", config.log_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Starting presence-api v{}", env!("CARGO_PKG_VERSION"));
    info!("Attendance data: {}", config.data_csv.display());
    info!("User directory: {}", config.users_xml.display());
    info!("Cache TTL: {}s", config.cache_ttl.num_seconds());

    let state = AppState::new(PresenceAnalyzer::from_config(&config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("presence-api listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
