//! Configuration types for vidgrab

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, path::PathBuf};
use utoipa::ToSchema;

/// Download behavior configuration (output directory, collisions, progress reporting)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Directory downloaded media is written to (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// File collision handling
    #[serde(default)]
    pub file_collision: FileCollisionAction,

    /// How progress is surfaced on the `/download` response stream
    #[serde(default)]
    pub progress_mode: ProgressMode,

    /// Capacity of the per-job event channel (default: 64)
    ///
    /// Only progress events are dropped when the channel is full; the terminal
    /// event always waits for room.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            file_collision: FileCollisionAction::default(),
            progress_mode: ProgressMode::default(),
            event_buffer: default_event_buffer(),
        }
    }
}

/// External tool configuration (yt-dlp)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Whether to search PATH for yt-dlp if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Extra arguments passed to every yt-dlp invocation, before the URL
    ///
    /// Useful for `--proxy`, `--cookies` and similar site-specific switches.
    #[serde(default)]
    pub ytdlp_args: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            search_path: true,
            ytdlp_args: Vec::new(),
        }
    }
}

/// Main configuration for vidgrab
///
/// Fields are organized into logical sub-configs:
/// - [`download`](DownloadConfig) — output directory, collisions, progress mode
/// - [`tools`](ToolsConfig) — yt-dlp discovery and arguments
/// - [`server`](ServerIntegrationConfig) — REST API settings
///
/// The `download` and `tools` sub-configs are flattened, so their keys sit at
/// the top level of the JSON document.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Download behavior settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// External tool settings
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// API server settings
    #[serde(flatten)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Download directory
    pub fn download_dir(&self) -> &PathBuf {
        &self.download.download_dir
    }

    /// Load configuration from a JSON file
    ///
    /// Missing keys fall back to their defaults, so `{}` is a valid file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
            key: None,
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
            key: None,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.download.download_dir.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "download_dir must not be empty".to_string(),
                key: Some("download_dir".to_string()),
            });
        }

        if self.download.event_buffer == 0 {
            return Err(Error::Config {
                message: "event_buffer must be at least 1".to_string(),
                key: Some("event_buffer".to_string()),
            });
        }

        if let Some(path) = &self.tools.ytdlp_path
            && path.as_os_str().is_empty()
        {
            return Err(Error::Config {
                message: "ytdlp_path must not be empty when set".to_string(),
                key: Some("ytdlp_path".to_string()),
            });
        }

        Ok(())
    }
}

/// File collision handling strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Append (1), (2), etc. to filename (default)
    #[default]
    Rename,
    /// Overwrite existing file
    Overwrite,
    /// Refuse to download when the target file exists
    Skip,
}

/// How a download job reports progress to the client
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProgressMode {
    /// Only the terminal event is streamed; per-chunk progress is computed and logged (default)
    #[default]
    Final,
    /// Every progress callback is forwarded to the stream before the terminal event
    Incremental,
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
        }
    }
}

// Default value functions
fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_event_buffer() -> usize {
    64
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}
