//! Core types for vidgrab

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

/// Request body for `POST /video-info`
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct VideoInfoRequest {
    /// Video page URL
    #[serde(default)]
    pub url: Option<String>,
}

impl VideoInfoRequest {
    /// URL as sent, empty when absent or null
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }
}

/// Request body for `POST /download`
///
/// Absent and null fields are both accepted here so the job runner can
/// report them as a terminal error event.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct DownloadRequest {
    /// Video page URL
    #[serde(default)]
    pub url: Option<String>,
    /// Extractor format identifier (e.g. "22", "137+140")
    #[serde(default)]
    pub format_id: Option<String>,
}

impl DownloadRequest {
    /// Request for `url` in format `format_id`
    pub fn new(url: impl Into<String>, format_id: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            format_id: Some(format_id.into()),
        }
    }

    /// URL as sent, empty when absent or null
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    /// Format identifier as sent, empty when absent or null
    pub fn format_id(&self) -> &str {
        self.format_id.as_deref().unwrap_or_default()
    }
}

/// Normalized video metadata returned by `POST /video-info`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VideoInfo {
    /// Video title
    pub title: String,
    /// Duration as "minutes:seconds", e.g. "2:05"
    pub duration: String,
    /// View count, if the site reports one
    pub views: Option<u64>,
    /// Thumbnail URL, if any
    pub thumbnail: Option<String>,
    /// Downloadable variants, audio-only streams excluded
    pub formats: Vec<FormatInfo>,
}

/// One downloadable stream variant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FormatInfo {
    /// Extractor format identifier
    pub format_id: String,
    /// Container extension
    pub ext: String,
    /// Resolution, "N/A" when unknown
    pub resolution: String,
    /// Size in bytes, 0 when unknown
    pub filesize: u64,
    /// Free-form note such as "720p" or "DASH video"
    pub format_note: String,
}

/// Status reported by the extractor's progress hook
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    /// Bytes are still arriving
    Downloading,
    /// The extractor finished writing one file
    Finished,
}

/// Payload delivered to the progress hook on each received chunk
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Hook status
    pub status: ProgressStatus,
    /// Bytes received so far
    pub downloaded_bytes: u64,
    /// Total size in bytes, if known
    pub total_bytes: Option<u64>,
}

impl ProgressUpdate {
    /// Percentage complete in `[0, 100]`
    ///
    /// Only `downloading` updates with a known, non-zero total carry a value;
    /// everything else reports 0.
    pub fn percent(&self) -> f64 {
        match (self.status, self.total_bytes) {
            (ProgressStatus::Downloading, Some(total)) if total > 0 => {
                (self.downloaded_bytes as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }
}

/// One message on a download's response stream
///
/// Serializes to `{"progress": <float>}`, `{"progress": 100}` or `{"error": "..."}`.
#[derive(Clone, Debug, PartialEq)]
pub enum DownloadEvent {
    /// Intermediate progress percentage
    Progress(f64),
    /// Terminal success marker
    Completed,
    /// Terminal failure with the error message
    Failed(String),
}

impl DownloadEvent {
    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, DownloadEvent::Completed | DownloadEvent::Failed(_))
    }

    /// Encode as one NDJSON line (JSON object followed by `\n`)
    pub fn to_ndjson(&self) -> String {
        // Serializing a map of a string key to a number or string cannot fail
        let mut line = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        line.push('\n');
        line
    }
}

impl Serialize for DownloadEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            DownloadEvent::Progress(percent) => map.serialize_entry("progress", percent)?,
            DownloadEvent::Completed => map.serialize_entry("progress", &100u8)?,
            DownloadEvent::Failed(message) => map.serialize_entry("error", message)?,
        }
        map.end()
    }
}

/// Lifecycle of a single download job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Created, nothing started yet
    Idle,
    /// Extractor work in progress
    Downloading,
    /// Extractor returned successfully
    Completed,
    /// Extractor or output handling failed
    Failed,
}

impl JobState {
    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::Idle, JobState::Downloading)
                | (JobState::Downloading, JobState::Completed)
                | (JobState::Downloading, JobState::Failed)
        )
    }

    /// Whether the job has finished
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobState::Idle => "idle",
            JobState::Downloading => "downloading",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        };
        f.write_str(name)
    }
}
