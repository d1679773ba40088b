//! CLI argument definitions using clap derive macros.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use vidgrab::Config;

/// Inspect and download online videos over HTTP.
///
/// Serves `POST /video-info` and `POST /download`, delegating extraction to
/// the yt-dlp binary.
#[derive(Parser, Debug)]
#[command(name = "vidgrab")]
#[command(author, version, about)]
pub struct Args {
    /// JSON configuration file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:5000
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Directory downloads are written to
    #[arg(short, long)]
    pub download_dir: Option<PathBuf>,

    /// Path to the yt-dlp executable
    #[arg(long)]
    pub ytdlp: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Default log filter when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "vidgrab=info,tower_http=info",
            1 => "vidgrab=debug,tower_http=debug",
            _ => "vidgrab=trace,tower_http=trace",
        }
    }

    /// Apply command-line overrides on top of `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.server.api.bind_address = bind;
        }
        if let Some(dir) = &self.download_dir {
            config.download.download_dir = dir.clone();
        }
        if let Some(path) = &self.ytdlp {
            config.tools.ytdlp_path = Some(path.clone());
        }
    }
}
