//! Fallback extractor used when no yt-dlp binary could be found

use super::traits::{DownloadOptions, Extractor, ProgressHook, RawVideoInfo};
use async_trait::async_trait;

const MISSING_BINARY: &str = "video extraction requires the yt-dlp binary. \
     Configure ytdlp_path in config or ensure yt-dlp is in PATH.";

/// Extractor that fails every call with [`crate::Error::NotSupported`]
///
/// Lets the server start and answer requests with a clear error instead of
/// refusing to boot on machines without yt-dlp.
pub struct UnavailableExtractor;

#[async_trait]
impl Extractor for UnavailableExtractor {
    async fn extract_info(&self, _url: &str) -> crate::Result<RawVideoInfo> {
        Err(crate::Error::NotSupported(MISSING_BINARY.into()))
    }

    async fn download(
        &self,
        _url: &str,
        _options: &DownloadOptions,
        _progress: ProgressHook,
    ) -> crate::Result<()> {
        Err(crate::Error::NotSupported(MISSING_BINARY.into()))
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
