//! Periodic URL fetcher
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod fetcher;
pub mod server;

// Re-export commonly used types for convenience
pub use fetcher::{FetchRecord, Fetcher, HttpFetcher, JobRegistry, JobSpec};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
