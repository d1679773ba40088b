//! Error types for vidgrab
//!
//! This module provides error handling for the library, including:
//! - The crate-wide [`Error`] enum and [`Result`] alias
//! - HTTP status code mapping for API integration
//! - The wire error body returned by the REST API

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for vidgrab operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vidgrab
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "download_dir")
        key: Option<String>,
    },

    /// The extractor rejected the URL, the site, or the requested format
    ///
    /// The message is the extractor's own text, passed through verbatim.
    #[error("{0}")]
    Extraction(String),

    /// External tool execution failed (could not spawn, broken pipe, etc.)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Operation not supported (missing binary, not implemented, etc.)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Request body was missing a required field or had an empty one
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Target file already exists and the collision policy forbids reuse
    #[error("file collision at {path}: {reason}")]
    FileCollision {
        /// The path that collided
        path: PathBuf,
        /// Why the collision could not be resolved
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Error body returned by the REST API
///
/// # Example JSON Response
///
/// ```json
/// { "error": "ERROR: [generic] 'not-a-url' is not a valid URL" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
}

impl ApiError {
    /// Create an API error from any message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - the client sent something the extractor could not use.
            // Extraction failures are reported as client errors regardless of cause.
            Error::Config { .. } => 400,
            Error::Extraction(_) => 400,
            Error::InvalidRequest(_) => 400,
            Error::NotSupported(_) => 400,
            Error::ExternalTool(_) => 400,

            // 409 Conflict
            Error::FileCollision { .. } => 409,

            // 500 Internal Server Error
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Extraction(_) => "extraction_failed",
            Error::ExternalTool(_) => "external_tool_error",
            Error::NotSupported(_) => "not_supported",
            Error::InvalidRequest(_) => "invalid_request",
            Error::FileCollision { .. } => "file_collision",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self::new(error.to_string())
    }
}
