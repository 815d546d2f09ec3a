//! Periodic fetch jobs and their history.
//!
//! This module provides the in-memory scheduling engine: a registry of jobs,
//! one runner task per job, a per-job history store and the executor that
//! performs and times each fetch.

pub mod executor;
mod history;
mod job;
mod registry;
mod runner;

pub use executor::{execute, Execution, FetchError, Fetcher, HttpFetcher};
pub use history::ResultStore;
pub use job::{FetchRecord, FetcherError, JobSpec};
pub use registry::JobRegistry;
pub use runner::JobRunner;
