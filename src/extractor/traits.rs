//! Traits and types for the video extractor port

use crate::types::ProgressUpdate;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Metadata document produced by [`Extractor::extract_info`]
///
/// Only the fields vidgrab consumes are modelled; everything else in the
/// extractor's output is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVideoInfo {
    /// Video title
    #[serde(default)]
    pub title: Option<String>,
    /// Duration in seconds (some sites report fractional values)
    #[serde(default)]
    pub duration: Option<f64>,
    /// View count
    #[serde(default)]
    pub view_count: Option<u64>,
    /// Thumbnail URL
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Extension of the extractor's default selection
    #[serde(default)]
    pub ext: Option<String>,
    /// Every variant the site offers
    #[serde(default)]
    pub formats: Option<Vec<RawFormat>>,
}

impl RawVideoInfo {
    /// Formats, treating a missing or null list as empty
    pub fn formats(&self) -> &[RawFormat] {
        self.formats.as_deref().unwrap_or_default()
    }

    /// Extension to use for a download of `format_id`
    ///
    /// Falls back to the top-level extension, then `mp4`, when the id is not
    /// a single listed format (merged selectors such as `137+140`).
    pub fn ext_for(&self, format_id: &str) -> String {
        self.formats()
            .iter()
            .find(|f| f.format_id == format_id)
            .and_then(|f| f.ext.clone())
            .or_else(|| self.ext.clone())
            .unwrap_or_else(|| "mp4".to_string())
    }
}

/// One variant as reported by the extractor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    /// Format identifier
    #[serde(default)]
    pub format_id: String,
    /// Container extension
    #[serde(default)]
    pub ext: Option<String>,
    /// Resolution string such as "1280x720" or "audio only"
    #[serde(default)]
    pub resolution: Option<String>,
    /// Exact size in bytes
    #[serde(default)]
    pub filesize: Option<u64>,
    /// Free-form note
    #[serde(default)]
    pub format_note: Option<String>,
}

/// Options for a single download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Format selector passed to the extractor
    pub format_id: String,
    /// Final path of the media file; replaced if it already exists
    pub output_path: PathBuf,
}

/// Callback invoked by the extractor for every chunk received
pub type ProgressHook = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Port to the external video extractor
///
/// # Examples
///
/// ```no_run
/// use vidgrab::extractor::{Extractor, YtDlpExtractor};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let extractor = YtDlpExtractor::from_path().expect("yt-dlp not found in PATH");
/// let info = extractor.extract_info("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
/// println!("{} formats", info.formats().len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Resolve `url` to its metadata and format list without downloading
    async fn extract_info(&self, url: &str) -> crate::Result<RawVideoInfo>;

    /// Download `url` in the requested format to `options.output_path`
    ///
    /// `progress` is called for each chunk received. Returns once the file is
    /// fully written or the transfer failed.
    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        progress: ProgressHook,
    ) -> crate::Result<()>;

    /// Name of this implementation
    fn name(&self) -> &'static str;
}
