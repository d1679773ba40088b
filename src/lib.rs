//! # vidgrab
//!
//! Small HTTP service for looking up online videos and downloading a chosen
//! format, with the heavy lifting delegated to `yt-dlp`.
//!
//! ## Endpoints
//!
//! - `POST /video-info`: title, duration, views, thumbnail and the list of
//!   downloadable (non audio-only) formats for a URL
//! - `POST /download`: downloads one format into the configured directory and
//!   streams newline-delimited JSON progress, ending in either
//!   `{"progress": 100}` or `{"error": "..."}`
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vidgrab::{Config, api, extractor, shutdown_signal};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::default());
//!     let extractor = extractor::from_config(&config.tools);
//!
//!     api::start_api_server(extractor, config, shutdown_signal()).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Video extractor port and yt-dlp implementation
pub mod extractor;
/// Download job runner
pub mod job;
/// Metadata normalization
pub mod metadata;
/// Output paths for downloaded media
pub mod storage;
/// Core types and events
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, FileCollisionAction, ProgressMode};
pub use error::{ApiError, Error, Result, ToHttpStatus};
pub use extractor::{Extractor, UnavailableExtractor, YtDlpExtractor};
pub use job::DownloadJobRunner;
pub use types::{DownloadEvent, DownloadRequest, FormatInfo, JobState, VideoInfo, VideoInfoRequest};

/// Resolve when the process is asked to stop
///
/// Pass this to [`api::start_api_server`] for graceful shutdown. On Unix
/// either SIGTERM or SIGINT stops the server; a signal that cannot be
/// registered is logged and simply never fires.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::SignalKind;

    let name = tokio::select! {
        name = next_signal(SignalKind::terminate(), "SIGTERM") => name,
        name = next_signal(SignalKind::interrupt(), "SIGINT") => name,
    };
    tracing::info!(signal = name, "shutdown requested");
}

#[cfg(unix)]
async fn next_signal(kind: tokio::signal::unix::SignalKind, name: &'static str) -> &'static str {
    match tokio::signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::warn!(signal = name, error = %e, "cannot listen for signal");
            std::future::pending::<()>().await;
        }
    }
    name
}

/// Resolve when the process is asked to stop
///
/// Pass this to [`api::start_api_server`] for graceful shutdown.
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!(signal = "ctrl-c", "shutdown requested");
}
