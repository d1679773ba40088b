//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`video`]: metadata lookup
//! - [`download`]: streamed download jobs
//! - [`system`]: health and OpenAPI

mod download;
mod system;
mod video;

// Re-export all handlers so `routes::function_name` continues to work
pub use download::*;
pub use system::*;
pub use video::*;
