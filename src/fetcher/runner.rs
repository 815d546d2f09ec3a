//! Per-job fetch loop.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::executor::{execute, Fetcher};
use super::history::ResultStore;
use super::job::JobSpec;
use crate::server::metrics;

/// Drives one job until its cancellation token fires.
///
/// Runs in a loop:
/// 1. Fetch the target (immediately on start, no initial delay)
/// 2. Append the record to the job's history
/// 3. Wait for the interval, or stop if cancelled first
pub struct JobRunner {
    spec: JobSpec,
    fetcher: Arc<dyn Fetcher>,
    history: ResultStore,
}

impl JobRunner {
    pub fn new(spec: JobSpec, fetcher: Arc<dyn Fetcher>, history: ResultStore) -> Self {
        Self {
            spec,
            fetcher,
            history,
        }
    }

    /// Main loop - call from a spawned task.
    ///
    /// The fetch itself is raced against `cancel` as well, so a runner that
    /// was cancelled mid-fetch appends nothing.
    pub async fn run(self, cancel: CancellationToken) {
        let JobSpec { id, url, interval } = &self.spec;
        info!(
            "Starting task id: {}, url: {}, interval: {}",
            id, url, interval
        );
        let interval = self.spec.interval_duration();

        loop {
            debug!("Fetching id: {}, url: {}", id, url);
            let execution = tokio::select! {
                execution = execute(self.fetcher.as_ref(), url) => execution,
                _ = cancel.cancelled() => break,
            };

            if let Some(failure) = &execution.failure {
                warn!("Fetch failed id: {}, url: {}, err: {}", id, url, failure);
            }
            metrics::record_fetch(execution.is_success(), execution.record.duration);
            self.history.append(execution.record).await;

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = cancel.cancelled() => break,
            }
        }

        info!(
            "Stopping task id: {}, url: {}, interval: {}",
            id,
            url,
            interval.as_secs()
        );
    }
}
