//! A stand-in for the yt-dlp binary and helpers around it

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

/// Title reported by the fake extractor; contains characters that must be sanitized
pub const FAKE_TITLE: &str = "Fake: Clip/One";

/// File name the fake title sanitizes to
pub const FAKE_FILE_NAME: &str = "Fake_ Clip_One.mp4";

/// Shell script that answers like yt-dlp
///
/// - `-J`: prints a metadata document
/// - `-f <id> -o <path>`: prints a Latin-1 log line, progress lines in the
///   vidgrab template, and writes a small file at `<path>`
/// - any URL containing `fail` exits 1 with an `ERROR:` line on stderr
/// - format `broken` fails after some progress
const FAKE_YTDLP: &str = r#"#!/bin/sh
mode=info
fmt=""
out=""
url=""
while [ $# -gt 0 ]; do
    case "$1" in
        -f) mode=download; fmt="$2"; shift ;;
        -o) out="$2"; shift ;;
        --progress-template) shift ;;
        --) shift; url="$1"; break ;;
    esac
    shift
done

case "$url" in
    *fail*)
        echo "WARNING: retrying" >&2
        echo "ERROR: [generic] Unsupported URL: $url" >&2
        exit 1
        ;;
esac

if [ "$mode" = info ]; then
    cat <<'JSON'
{"id": "abc", "title": "Fake: Clip/One", "duration": 754.6, "view_count": 42,
 "thumbnail": "https://img.example.com/abc.jpg", "ext": "mp4",
 "formats": [
   {"format_id": "140", "ext": "m4a", "resolution": "audio only", "filesize": 900, "format_note": "medium"},
   {"format_id": "18", "ext": "mp4", "resolution": "640x360", "filesize": 2048, "format_note": "360p"},
   {"format_id": "broken", "ext": "mp4", "resolution": "1280x720"}
 ]}
JSON
    exit 0
fi

echo "[generic] abc: Downloading webpage"
printf '[download] Destination: caf\351.mp4\n'
echo "VIDGRAB|downloading|512|2048|NA"
echo "VIDGRAB|downloading|1024|NA|2048.0"
if [ "$fmt" = broken ]; then
    echo "ERROR: unable to download video data: HTTP Error 403: Forbidden" >&2
    exit 1
fi
echo "VIDGRAB|downloading|2048|2048|NA"
echo "VIDGRAB|finished|2048|2048|NA"
printf 'media' > "$out"
"#;

static FAKE_DIR: OnceLock<TempDir> = OnceLock::new();

/// Path of the fake yt-dlp script, written once per test binary
///
/// Written before any test can spawn it, so no process inherits an open
/// write handle to the script.
pub fn fake_ytdlp() -> PathBuf {
    let dir = FAKE_DIR.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yt-dlp");
        std::fs::write(&path, FAKE_YTDLP).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        dir
    });
    dir.path().join("yt-dlp")
}

/// Names of the regular files in `dir`, sorted
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
