//! Equilibrium monitor entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Market equilibrium monitor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via EQMON_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the configured symbol
    #[arg(short, long)]
    symbol: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Must run before any TLS connection
    eqmon_transport::init_crypto();

    let args = Args::parse();

    // CLI arg > EQMON_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("EQMON_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    let mut config = eqmon_bot::AppConfig::from_file(&config_path)?;
    if let Some(symbol) = args.symbol {
        config.symbol = symbol;
    }

    eqmon_telemetry::init_logging(&config.telemetry.log_level)?;
    info!(
        config_path = %config_path,
        symbol = %config.symbol,
        "Starting eqmon v{}",
        env!("CARGO_PKG_VERSION")
    );

    let app = eqmon_bot::Application::new(config)?;
    let state = app.run().await?;

    info!(
        readings = state.stats.readings_count,
        alerts = state.alerts,
        "Monitor stopped"
    );
    Ok(())
}
