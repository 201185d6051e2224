//! HTTP server for the overtime ledger engine.
//!
//! Environment:
//! - `OVERTIME_CONFIG_DIR`: directory holding `policy.yaml` (default `./config`)
//! - `OVERTIME_BIND`: listen address (default `0.0.0.0:3000`)
//! - `OVERTIME_LOG`: tracing filter (default `info`)

use std::env;

use overtime_ledger::api::{AppState, create_router};
use overtime_ledger::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config";
const DEFAULT_BIND: &str = "0.0.0.0:3000";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("OVERTIME_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_dir = env::var("OVERTIME_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind = env::var("OVERTIME_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        buffer_hours = %config.policy().buffer_hours,
        allocation_mode = ?config.policy().allocation_mode,
        "Loaded policy"
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(bind = %bind, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
