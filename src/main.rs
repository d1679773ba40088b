//! vidgrab server entry point.

use clap::Parser;
use std::sync::Arc;
use vidgrab::{Config, api, extractor, shutdown_signal};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::debug!(?args, "CLI arguments parsed");

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    tracing::info!(
        download_dir = %config.download.download_dir.display(),
        progress_mode = ?config.download.progress_mode,
        file_collision = ?config.download.file_collision,
        "configuration loaded"
    );

    let extractor = extractor::from_config(&config.tools);
    api::start_api_server(extractor, Arc::new(config), shutdown_signal()).await?;

    Ok(())
}
