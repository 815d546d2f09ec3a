use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration of a periodic fetch job.
///
/// An `id` of `0` means "not assigned yet"; the registry replaces it with the
/// next identifier from its counter when the spec is installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    #[serde(default)]
    pub id: i64,
    pub url: String,
    /// Seconds between the start of one wait and the next fetch.
    pub interval: u64,
}

impl JobSpec {
    pub fn new(url: impl Into<String>, interval: u64) -> Self {
        Self {
            id: 0,
            url: url.into(),
            interval,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Check the basic shape constraints a spec must satisfy before a job is
    /// created for it.
    pub fn validate(&self) -> Result<(), FetcherError> {
        if self.id < 0 {
            return Err(FetcherError::InvalidSpec(format!(
                "id must not be negative, got {}",
                self.id
            )));
        }
        if self.interval == 0 {
            return Err(FetcherError::InvalidSpec(
                "interval must be greater than zero".to_string(),
            ));
        }
        if let Err(e) = reqwest::Url::parse(&self.url) {
            return Err(FetcherError::InvalidSpec(format!(
                "invalid url {:?}: {}",
                self.url, e
            )));
        }
        Ok(())
    }
}

/// One timestamped outcome of a single fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRecord {
    /// Full response body, empty when the request or the body read failed.
    pub response: String,
    /// Wall-clock latency of the fetch in seconds.
    pub duration: f64,
    /// Unix timestamp of the fetch start, in seconds.
    pub created_at: f64,
}

/// Errors surfaced by registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FetcherError {
    #[error("Job not found: {0}")]
    NotFound(i64),

    #[error("Invalid job spec: {0}")]
    InvalidSpec(String),

    #[error("Registry is shutting down")]
    ShuttingDown,
}
