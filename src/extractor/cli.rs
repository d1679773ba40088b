//! CLI-based extractor using the external yt-dlp binary

use super::parser::{
    decode_line, error_message, parse_info_json, parse_progress_line, progress_template,
};
use super::traits::{DownloadOptions, Extractor, ProgressHook, RawVideoInfo};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{ChildStdout, Command};

/// Extractor backed by the `yt-dlp` command line tool
///
/// # Examples
///
/// ```no_run
/// use vidgrab::extractor::YtDlpExtractor;
/// use std::path::PathBuf;
///
/// // Explicit path
/// let extractor = YtDlpExtractor::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let extractor = YtDlpExtractor::from_path().expect("yt-dlp not found in PATH");
/// ```
pub struct YtDlpExtractor {
    binary_path: PathBuf,
    extra_args: Vec<String>,
}

impl YtDlpExtractor {
    /// Create an extractor for an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            extra_args: Vec::new(),
        }
    }

    /// Attempt to find yt-dlp in PATH
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }

    /// Arguments appended to every invocation, before the URL
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Path of the binary this extractor runs
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary_path);
        command
            .stdin(Stdio::null())
            .arg("--no-warnings")
            .arg("--no-playlist");
        command
    }
}

/// Feed every progress line on `stdout` to `progress` until EOF
///
/// Lines are read as raw bytes; anything that is not a progress line is
/// only traced.
async fn forward_progress(stdout: ChildStdout, progress: &ProgressHook) -> std::io::Result<()> {
    let mut reader = BufReader::new(stdout);
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw).await? == 0 {
            return Ok(());
        }
        let line = decode_line(&raw);
        match parse_progress_line(&line) {
            Some(update) => progress(update),
            None => tracing::trace!(line = %line, "yt-dlp"),
        }
    }
}

/// yt-dlp treats `-o` as an output template; literal `%` must be doubled
fn escape_output_template(path: &Path) -> OsString {
    let raw = path.as_os_str().to_string_lossy();
    OsString::from(raw.replace('%', "%%"))
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    async fn extract_info(&self, url: &str) -> crate::Result<RawVideoInfo> {
        tracing::debug!(url, binary = %self.binary_path.display(), "running yt-dlp metadata extraction");

        let output = self
            .command()
            .arg("-J")
            .args(&self.extra_args)
            .arg("--")
            .arg(url)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| crate::Error::ExternalTool(format!("Failed to execute yt-dlp: {}", e)))?;

        if !output.status.success() {
            return Err(crate::Error::Extraction(error_message(
                &output.stderr,
                output.status.code(),
            )));
        }

        parse_info_json(&output.stdout)
    }

    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        progress: ProgressHook,
    ) -> crate::Result<()> {
        let mut command = self.command();
        command
            .arg("-f")
            .arg(&options.format_id)
            .arg("-o")
            .arg(escape_output_template(&options.output_path))
            .arg("--newline")
            .arg("--progress-template")
            .arg(progress_template())
            .arg("--force-overwrites")
            .args(&self.extra_args)
            .arg("--")
            .arg(url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            url,
            format_id = %options.format_id,
            output = %options.output_path.display(),
            "starting yt-dlp download"
        );

        let mut child = command
            .spawn()
            .map_err(|e| crate::Error::ExternalTool(format!("Failed to execute yt-dlp: {}", e)))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            crate::Error::ExternalTool("Failed to capture yt-dlp stdout".to_string())
        })?;
        let mut stderr = child.stderr.take().ok_or_else(|| {
            crate::Error::ExternalTool("Failed to capture yt-dlp stderr".to_string())
        })?;

        // Drain stderr concurrently so a chatty extractor cannot fill the pipe and stall
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = stderr.read_to_end(&mut buf).await {
                tracing::debug!(error = %e, "failed to read yt-dlp stderr");
            }
            buf
        });

        if let Err(e) = forward_progress(stdout, &progress).await {
            tracing::warn!(error = %e, "lost yt-dlp output, stopping the download");
            if let Err(kill_error) = child.kill().await {
                tracing::debug!(error = %kill_error, "yt-dlp had already exited");
            }
            return Err(e.into());
        }

        let status = child.wait().await?;
        let stderr = stderr_task.await.unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(crate::Error::Extraction(error_message(
                &stderr,
                status.code(),
            )))
        }
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}
