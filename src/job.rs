//! Download job runner behind `POST /download`
//!
//! A job is one-shot: `Idle → Downloading → {Completed, Failed}`. It runs on
//! its own task and reports through a bounded channel that the HTTP response
//! streams from, so the response can flush while the transfer is still going.
//!
//! In [`ProgressMode::Final`] the progress hook only logs; the client sees a
//! single terminal event. In [`ProgressMode::Incremental`] each computed
//! percentage is forwarded ahead of the terminal event.

use crate::config::{Config, FileCollisionAction, ProgressMode};
use crate::error::{Error, Result};
use crate::extractor::{DownloadOptions, Extractor, ProgressHook};
use crate::storage;
use crate::types::{DownloadEvent, DownloadRequest, JobState, ProgressStatus, ProgressUpdate};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

/// Starts download jobs against a shared extractor and configuration
#[derive(Clone)]
pub struct DownloadJobRunner {
    extractor: Arc<dyn Extractor>,
    config: Arc<Config>,
}

impl DownloadJobRunner {
    /// Create a runner
    pub fn new(extractor: Arc<dyn Extractor>, config: Arc<Config>) -> Self {
        Self { extractor, config }
    }

    /// Spawn a job for `request` and return its event stream
    ///
    /// The stream ends after exactly one terminal event. Dropping the stream
    /// does not stop the job; it runs to completion and its remaining events
    /// are discarded.
    pub fn start(&self, request: DownloadRequest) -> ReceiverStream<DownloadEvent> {
        let (tx, rx) = mpsc::channel(self.config.download.event_buffer.max(1));
        let runner = self.clone();
        let span = tracing::info_span!(
            "download_job",
            url = request.url(),
            format_id = request.format_id()
        );

        tokio::spawn(async move { runner.run(request, tx).await }.instrument(span));

        ReceiverStream::new(rx)
    }

    /// Run one job to its terminal state, sending events to `events`
    pub async fn run(
        &self,
        request: DownloadRequest,
        events: mpsc::Sender<DownloadEvent>,
    ) -> JobState {
        let mut job = DownloadJob {
            request,
            state: JobState::Idle,
        };

        job.transition(JobState::Downloading);
        let hook = self.progress_hook(events.clone());

        let outcome = self.execute(&job.request, hook).await;
        let terminal = match outcome {
            Ok(path) => {
                job.transition(JobState::Completed);
                tracing::info!(output = %path.display(), "download completed");
                DownloadEvent::Completed
            }
            Err(e) => {
                job.transition(JobState::Failed);
                tracing::warn!(error = %e, "download failed");
                DownloadEvent::Failed(e.to_string())
            }
        };

        if events.send(terminal).await.is_err() {
            tracing::debug!("client disconnected before the terminal event was delivered");
        }

        job.state
    }

    /// Resolve the output path, then hand the transfer to the extractor
    async fn execute(&self, request: &DownloadRequest, hook: ProgressHook) -> Result<PathBuf> {
        let url = request.url().trim();
        if url.is_empty() {
            return Err(Error::InvalidRequest("missing required field: url".to_string()));
        }
        let format_id = request.format_id().trim();
        if format_id.is_empty() {
            return Err(Error::InvalidRequest(
                "missing required field: format_id".to_string(),
            ));
        }

        let info = self.extractor.extract_info(url).await?;
        let title = info.title.as_deref().unwrap_or_default();
        let ext = info.ext_for(format_id);

        let settings = &self.config.download;
        tokio::fs::create_dir_all(&settings.download_dir).await?;
        let output_path =
            storage::claim_target(&settings.download_dir, title, &ext, settings.file_collision)?;

        let options = DownloadOptions {
            format_id: format_id.to_string(),
            output_path,
        };

        tracing::info!(
            output = %options.output_path.display(),
            extractor = self.extractor.name(),
            "download started"
        );

        if let Err(e) = self.extractor.download(url, &options, hook).await {
            if settings.file_collision != FileCollisionAction::Overwrite {
                release_claim(&options.output_path).await;
            }
            return Err(e);
        }
        Ok(options.output_path)
    }

    fn progress_hook(&self, events: mpsc::Sender<DownloadEvent>) -> ProgressHook {
        match self.config.download.progress_mode {
            ProgressMode::Final => Arc::new(|update: ProgressUpdate| {
                if update.status == ProgressStatus::Downloading {
                    tracing::trace!(percent = update.percent(), "download progress");
                }
            }),
            ProgressMode::Incremental => {
                // f64 bits of the last forwarded percentage; NaN never matches a real value
                let last_sent = AtomicU64::new(f64::NAN.to_bits());
                Arc::new(move |update: ProgressUpdate| {
                    if update.status != ProgressStatus::Downloading {
                        return;
                    }
                    let percent = update.percent();
                    if last_sent.swap(percent.to_bits(), Ordering::Relaxed) == percent.to_bits() {
                        return;
                    }
                    match events.try_send(DownloadEvent::Progress(percent)) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            tracing::trace!(percent, "event buffer full, dropping progress update");
                        }
                        Err(TrySendError::Closed(_)) => {
                            tracing::trace!(percent, "client gone, dropping progress update");
                        }
                    }
                })
            }
        }
    }
}

/// Remove the file claimed for a failed download
async fn release_claim(path: &std::path::Path) {
    if let Err(e) = tokio::fs::remove_file(path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "could not remove claimed file");
    }
}

struct DownloadJob {
    request: DownloadRequest,
    state: JobState,
}

impl DownloadJob {
    fn transition(&mut self, next: JobState) {
        if !self.state.can_transition_to(next) {
            tracing::error!(from = %self.state, to = %next, "illegal job state transition ignored");
            return;
        }
        if next.is_terminal() {
            tracing::debug!(from = %self.state, to = %next, "job finished");
        } else {
            tracing::debug!(from = %self.state, to = %next, "job state changed");
        }
        self.state = next;
    }
}
