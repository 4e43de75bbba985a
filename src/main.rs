//! starter-api entry point.
//!
//! Initializes tracing, resolves configuration from an optional TOML file and
//! the environment, opens the database pool on a best-effort basis, builds
//! the Axum router and serves until shutdown.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use starter_api::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use starter_api::database::{self, DatabaseInit, HealthProbe, PoolLimits};
use starter_api::http::start_server;
use starter_api::{create_router, AppState};

/// starter-api: a minimal JSON API skeleton
#[derive(Parser, Debug)]
#[command(name = "starter-api", version, about)]
struct Args {
    /// Optional path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "starter_api=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(log_level: Option<String>, format: LogFormat) {
    // Priority: CLI > env > default
    let log_filter = log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let fmt_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref())?;
    init_tracing(args.log_level, config.logging.format);

    tracing::info!(environment = %config.environment, "Loaded configuration");

    let limits = PoolLimits::from_config(&config.database);
    let init = database::connect(&config.database.url, limits).await;
    match &init {
        DatabaseInit::Connected(_) => {
            tracing::info!(max_connections = limits.max_open, "Database connected successfully");
        }
        DatabaseInit::Unreachable { error, .. } => {
            tracing::warn!(error = %error, "Database connection failed");
            tracing::warn!("API will run without database features until the database is reachable");
        }
        DatabaseInit::Unavailable(error) => {
            tracing::warn!(error = %error, "Database connection failed");
            tracing::warn!("API will run without database features");
        }
    }
    let database = init.into_database();

    let probe = database
        .clone()
        .map(|database| Arc::new(database) as Arc<dyn HealthProbe>);
    let state = AppState::new(config.clone(), probe);
    let app = create_router(state);

    let result = start_server(app, &config).await;

    if let Some(database) = database {
        database.close().await;
        tracing::debug!("Database pool closed");
    }

    if let Err(error) = &result {
        tracing::error!(error = %error, "Server failed");
    }
    result?;

    Ok(())
}
