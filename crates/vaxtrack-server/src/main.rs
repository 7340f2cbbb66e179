//! VaxTrack Server - COVID-19 vaccination statistics dashboard API
//!
//! Main entry point for the VaxTrack server binary.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use vaxtrack_common::LoggingConfig;
use vaxtrack_config::ConfigLoader;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Bind address override (e.g., "0.0.0.0:8080")
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level override (e.g., "info", "debug", "trace")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration before logging so the config file can set the level
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
        config.validate()?;
    }

    let logging = LoggingConfig {
        level: args
            .log_level
            .unwrap_or_else(|| config.logging.level.clone()),
        json_format: config.logging.json_format,
        file_path: config.logging.file_path.clone(),
        ..LoggingConfig::default()
    };
    vaxtrack_common::init_logging(logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting VaxTrack server");
    info!(
        "Data source: {}, generation window: {} days",
        config.data.source, config.data.window_days
    );

    vaxtrack_server::serve(config).await?;

    Ok(())
}
