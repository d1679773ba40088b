//! Application state for the API server

use crate::Config;
use crate::extractor::Extractor;
use crate::job::DownloadJobRunner;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Extractor used for metadata lookups
    pub extractor: Arc<dyn Extractor>,

    /// Starts download jobs and hands back their event streams
    pub jobs: DownloadJobRunner,
}

impl AppState {
    /// Create a new AppState; `config` is handed to the job runner
    pub fn new(extractor: Arc<dyn Extractor>, config: Arc<Config>) -> Self {
        let jobs = DownloadJobRunner::new(extractor.clone(), config);
        Self { extractor, jobs }
    }
}
