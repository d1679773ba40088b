//! Shared test helpers: a scripted extractor and canned metadata.

use crate::extractor::{DownloadOptions, Extractor, ProgressHook, RawVideoInfo};
use crate::types::{ProgressStatus, ProgressUpdate};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned extractor document with one audio-only format among video formats
pub(crate) fn sample_info() -> RawVideoInfo {
    serde_json::from_value(serde_json::json!({
        "title": "Sample Clip",
        "duration": 125,
        "view_count": 1234,
        "thumbnail": "https://img.example.com/thumb.jpg",
        "ext": "mp4",
        "formats": [
            {"format_id": "140", "ext": "m4a", "resolution": "audio only", "filesize": 1000, "format_note": "medium"},
            {"format_id": "18", "ext": "mp4", "resolution": "640x360", "filesize": 5000, "format_note": "360p"},
            {"format_id": "22", "ext": "mp4", "resolution": "1280x720", "format_note": "720p"},
            {"format_id": "sb0", "ext": "mhtml"}
        ]
    }))
    .unwrap_or_default()
}

/// Progress updates for a 1000-byte transfer in four chunks
pub(crate) fn chunked_progress() -> Vec<ProgressUpdate> {
    [250, 500, 750, 1000]
        .into_iter()
        .map(|downloaded_bytes| ProgressUpdate {
            status: ProgressStatus::Downloading,
            downloaded_bytes,
            total_bytes: Some(1000),
        })
        .chain(std::iter::once(ProgressUpdate {
            status: ProgressStatus::Finished,
            downloaded_bytes: 1000,
            total_bytes: Some(1000),
        }))
        .collect()
}

/// Extractor whose behaviour is fixed up front
///
/// `download` replays `progress` through the hook, then writes a small file
/// at the requested output path (mirroring the real side effect) or fails.
pub(crate) struct ScriptedExtractor {
    info: Result<RawVideoInfo, String>,
    progress: Vec<ProgressUpdate>,
    download_error: Option<String>,
    info_calls: AtomicUsize,
    downloads: Mutex<Vec<DownloadOptions>>,
}

impl ScriptedExtractor {
    /// Metadata succeeds with [`sample_info`]; downloads succeed with [`chunked_progress`]
    pub(crate) fn succeeding() -> Self {
        Self {
            info: Ok(sample_info()),
            progress: chunked_progress(),
            download_error: None,
            info_calls: AtomicUsize::new(0),
            downloads: Mutex::new(Vec::new()),
        }
    }

    /// Metadata fails with `message`
    pub(crate) fn failing_info(message: &str) -> Self {
        Self {
            info: Err(message.to_string()),
            ..Self::succeeding()
        }
    }

    /// Metadata succeeds but the transfer fails with `message` after some progress
    pub(crate) fn failing_download(message: &str) -> Self {
        Self {
            download_error: Some(message.to_string()),
            progress: chunked_progress().into_iter().take(2).collect(),
            ..Self::succeeding()
        }
    }

    /// Replace the scripted progress updates
    pub(crate) fn with_progress(mut self, progress: Vec<ProgressUpdate>) -> Self {
        self.progress = progress;
        self
    }

    pub(crate) fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn downloads(&self) -> Vec<DownloadOptions> {
        self.downloads
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn extract_info(&self, _url: &str) -> crate::Result<RawVideoInfo> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        self.info.clone().map_err(crate::Error::Extraction)
    }

    async fn download(
        &self,
        _url: &str,
        options: &DownloadOptions,
        progress: ProgressHook,
    ) -> crate::Result<()> {
        if let Ok(mut downloads) = self.downloads.lock() {
            downloads.push(options.clone());
        }

        for update in &self.progress {
            progress(*update);
            tokio::task::yield_now().await;
        }

        if let Some(message) = &self.download_error {
            return Err(crate::Error::Extraction(message.clone()));
        }

        tokio::fs::write(&options.output_path, b"media").await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
