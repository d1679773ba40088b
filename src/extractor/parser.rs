//! Parsers for yt-dlp output

use super::traits::RawVideoInfo;
use crate::types::{ProgressStatus, ProgressUpdate};
use std::borrow::Cow;

/// Marker that starts every progress line vidgrab asks yt-dlp to print
pub const PROGRESS_PREFIX: &str = "VIDGRAB";

/// Value passed to `--progress-template`
///
/// Produces lines like `VIDGRAB|downloading|1024|4096|NA` on stdout.
pub fn progress_template() -> String {
    format!(
        "download:{}|%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s",
        PROGRESS_PREFIX
    )
}

/// Parse the JSON document printed by `yt-dlp -J`
///
/// Unreadable output is reported as an extraction failure, like any other
/// problem on the extractor side.
pub fn parse_info_json(stdout: &[u8]) -> crate::Result<RawVideoInfo> {
    serde_json::from_slice(stdout).map_err(|e| {
        crate::Error::Extraction(format!("could not parse yt-dlp output: {}", e))
    })
}

/// Parse one stdout line produced by [`progress_template`]
///
/// Returns `None` for any other line and for statuses other than
/// `downloading`/`finished`. Unknown sizes (`NA`, `None`) become `None`;
/// the estimated total stands in when the exact total is unknown.
pub fn parse_progress_line(line: &str) -> Option<ProgressUpdate> {
    let mut fields = line.trim().split('|');

    if fields.next()? != PROGRESS_PREFIX {
        return None;
    }

    let status = match fields.next()? {
        "downloading" => ProgressStatus::Downloading,
        "finished" => ProgressStatus::Finished,
        _ => return None,
    };

    let downloaded_bytes = parse_byte_count(fields.next()?).unwrap_or(0);
    let total_bytes = parse_byte_count(fields.next().unwrap_or("NA"));
    let estimate = parse_byte_count(fields.next().unwrap_or("NA"));

    Some(ProgressUpdate {
        status,
        downloaded_bytes,
        total_bytes: total_bytes.or(estimate),
    })
}

/// Byte counts arrive as integers, floats (`12345.0`) or `NA`
fn parse_byte_count(field: &str) -> Option<u64> {
    let value: f64 = field.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value as u64)
    } else {
        None
    }
}

/// Decode one raw output line, dropping the line terminator
///
/// Invalid UTF-8 is replaced rather than rejected so a stray byte in a log
/// line cannot end the read loop.
pub fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let end = raw
        .iter()
        .rposition(|b| !matches!(b, b'\n' | b'\r'))
        .map_or(0, |i| i + 1);
    String::from_utf8_lossy(&raw[..end])
}

/// Pick the message to surface for a failed yt-dlp run
///
/// Prefers the last `ERROR:` line, then the last non-empty stderr line, then
/// the exit code.
pub fn error_message(stderr: &[u8], exit_code: Option<i32>) -> String {
    // Titles and paths in log lines are not always valid UTF-8
    let output = String::from_utf8_lossy(stderr);

    let mut last_error = None;
    let mut last_line = None;
    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with("ERROR:") {
            last_error = Some(line);
        }
        last_line = Some(line);
    }

    if let Some(line) = last_error.or(last_line) {
        return line.to_string();
    }

    match exit_code {
        Some(code) => format!("yt-dlp exited with status {}", code),
        None => "yt-dlp was terminated by a signal".to_string(),
    }
}
