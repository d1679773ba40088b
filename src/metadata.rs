//! Metadata resolution for `POST /video-info`
//!
//! Turns the extractor's raw document into the [`VideoInfo`] response shape.

use crate::error::{Error, Result};
use crate::extractor::{Extractor, RawFormat, RawVideoInfo};
use crate::types::{FormatInfo, VideoInfo};

/// Resolution string the extractor uses for audio-only streams
pub const AUDIO_ONLY: &str = "audio only";

/// Ask `extractor` for `url`'s metadata and normalize it
pub async fn resolve(extractor: &dyn Extractor, url: &str) -> Result<VideoInfo> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::InvalidRequest("missing required field: url".to_string()));
    }

    let raw = extractor.extract_info(url).await?;
    let info = normalize(raw)?;

    tracing::debug!(
        url,
        title = %info.title,
        formats = info.formats.len(),
        "resolved video metadata"
    );

    Ok(info)
}

/// Shape a raw extractor document into the API response
///
/// A missing title is an error; every other field has a fallback.
pub fn normalize(raw: RawVideoInfo) -> Result<VideoInfo> {
    let formats = raw
        .formats()
        .iter()
        .filter(|f| f.resolution.as_deref() != Some(AUDIO_ONLY))
        .map(normalize_format)
        .collect();

    let title = raw.title.ok_or_else(|| {
        Error::Extraction("extractor returned no title for this URL".to_string())
    })?;

    let seconds = raw
        .duration
        .filter(|d| d.is_finite() && *d >= 0.0)
        .map(|d| d as u64)
        .unwrap_or(0);

    Ok(VideoInfo {
        title,
        duration: format_duration(seconds),
        views: raw.view_count,
        thumbnail: raw.thumbnail,
        formats,
    })
}

fn normalize_format(format: &RawFormat) -> FormatInfo {
    FormatInfo {
        format_id: format.format_id.clone(),
        ext: format.ext.clone().unwrap_or_default(),
        resolution: format
            .resolution
            .clone()
            .unwrap_or_else(|| "N/A".to_string()),
        filesize: format.filesize.unwrap_or(0),
        format_note: format.format_note.clone().unwrap_or_default(),
    }
}

/// Format whole seconds as `minutes:seconds`
///
/// Minutes are unbounded and seconds are zero-padded: 125 → "2:05",
/// 3600 → "60:00".
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
