//! Output paths for downloaded media
//!
//! Titles come straight from remote sites, so they are sanitized before they
//! touch the filesystem: no separators, no traversal, no reserved characters.

use crate::config::FileCollisionAction;
use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

/// Highest counter tried before Rename gives up
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Maximum length of a sanitized file stem in bytes
const MAX_STEM_BYTES: usize = 200;

/// Stem used when a title sanitizes to nothing
const FALLBACK_STEM: &str = "video";

/// Make `title` safe to use as a single path component
///
/// # Examples
///
/// ```
/// use vidgrab::storage::sanitize_title;
///
/// assert_eq!(sanitize_title("AC/DC: Live"), "AC_DC_ Live");
/// assert_eq!(sanitize_title("../../etc/passwd"), "_.._etc_passwd");
/// assert_eq!(sanitize_title(".."), "video");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c.is_whitespace() || c == '.');
    let truncated = truncate_on_char_boundary(trimmed, MAX_STEM_BYTES).trim_end();

    if truncated.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        truncated.to_string()
    }
}

fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Extensions are reduced to ASCII alphanumerics; empty becomes `mp4`
fn sanitize_extension(ext: &str) -> String {
    let cleaned: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(16)
        .collect();
    if cleaned.is_empty() {
        "mp4".to_string()
    } else {
        cleaned
    }
}

/// Reserve the destination for a download of `title` with extension `ext`
///
/// The name is [`sanitize_title`] plus the sanitized extension, placed in
/// `dir` (which must exist). Under Rename and Skip the returned path has
/// been created as an empty file with `create_new`, so no other job can be
/// handed the same path; the caller owns it and removes it if the download
/// fails. Rename walks `clip.mp4`, `clip (1).mp4`, `clip (2).mp4` until a
/// name is free. Overwrite returns the plain name and creates nothing.
pub fn claim_target(
    dir: &Path,
    title: &str,
    ext: &str,
    action: FileCollisionAction,
) -> Result<PathBuf> {
    let stem = sanitize_title(title);
    let ext = sanitize_extension(ext);
    let plain = dir.join(format!("{}.{}", stem, ext));

    match action {
        FileCollisionAction::Overwrite => Ok(plain),
        FileCollisionAction::Skip => {
            if create_placeholder(&plain)? {
                Ok(plain)
            } else {
                Err(Error::FileCollision {
                    path: plain,
                    reason: "file already exists and collision action is skip".to_string(),
                })
            }
        }
        FileCollisionAction::Rename => {
            if create_placeholder(&plain)? {
                return Ok(plain);
            }
            for n in 1..=MAX_RENAME_ATTEMPTS {
                let candidate = dir.join(format!("{} ({}).{}", stem, n, ext));
                if create_placeholder(&candidate)? {
                    return Ok(candidate);
                }
            }
            Err(Error::FileCollision {
                path: plain,
                reason: format!("no free name after {} attempts", MAX_RENAME_ATTEMPTS),
            })
        }
    }
}

/// Create an empty file at `path`; `false` if something is already there
fn create_placeholder(path: &Path) -> Result<bool> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.into()),
    }
}
