//! Network side of a fetch job.
//!
//! The [`Fetcher`] trait is the transport seam; [`execute`] wraps a single call
//! with timing and turns every outcome, failed or not, into a [`FetchRecord`].

use super::job::FetchRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors a single fetch can run into. These never escape [`execute`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Http request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Failed reading body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Issues one request against a target and returns the full body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, target: &str) -> Result<String, FetchError>;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout_sec` seconds.
    pub fn new(timeout_sec: u64) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_sec);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(FetchError::Request)?;

        // Error statuses are not failures: their body is history like any other.
        response.text().await.map_err(FetchError::Body)
    }
}

/// Result of [`execute`]: the record to store, plus the failure if there was one.
pub struct Execution {
    pub record: FetchRecord,
    pub failure: Option<FetchError>,
}

impl Execution {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Run a single fetch against `target` and time it.
///
/// Always produces a record. On failure the body is empty and the error is
/// handed back for the caller to log.
pub async fn execute(fetcher: &dyn Fetcher, target: &str) -> Execution {
    let created_at = unix_now_secs();
    let start = Instant::now();

    let outcome = fetcher.fetch(target).await;
    let duration = start.elapsed().as_secs_f64();

    let (response, failure) = match outcome {
        Ok(body) => (body, None),
        Err(e) => (String::new(), Some(e)),
    };

    Execution {
        record: FetchRecord {
            response,
            duration,
            created_at,
        },
        failure,
    }
}

fn unix_now_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
