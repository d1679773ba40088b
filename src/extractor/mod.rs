//! Video extractor port
//!
//! The extractor resolves a URL to metadata and performs the actual network
//! transfer for a chosen format. vidgrab only shapes requests and responses
//! around it.
//!
//! ## Architecture
//!
//! The core abstraction is the [`Extractor`] trait. Implementations:
//!
//! - [`YtDlpExtractor`]: drives the external `yt-dlp` binary
//! - [`UnavailableExtractor`]: stand-in when no binary is available
//!
//! [`from_config`] picks one based on [`ToolsConfig`].

mod cli;
mod parser;
mod traits;
mod unavailable;

pub use cli::YtDlpExtractor;
pub use parser::{
    decode_line, error_message, parse_info_json, parse_progress_line, progress_template,
};
pub use traits::{DownloadOptions, Extractor, ProgressHook, RawFormat, RawVideoInfo};
pub use unavailable::UnavailableExtractor;

use crate::config::ToolsConfig;
use std::sync::Arc;

/// Build the extractor described by `tools`
///
/// An explicit `ytdlp_path` wins; otherwise PATH is searched when
/// `search_path` is set. Falls back to [`UnavailableExtractor`].
pub fn from_config(tools: &ToolsConfig) -> Arc<dyn Extractor> {
    let extractor = match &tools.ytdlp_path {
        Some(path) => Some(YtDlpExtractor::new(path.clone())),
        None if tools.search_path => YtDlpExtractor::from_path(),
        None => None,
    };

    match extractor {
        Some(extractor) => {
            tracing::info!(binary = %extractor.binary_path().display(), "using yt-dlp extractor");
            Arc::new(extractor.with_args(tools.ytdlp_args.clone()))
        }
        None => {
            tracing::warn!("yt-dlp not found; every extraction request will fail until it is installed");
            Arc::new(UnavailableExtractor)
        }
    }
}
