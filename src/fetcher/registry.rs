use super::executor::Fetcher;
use super::history::ResultStore;
use super::job::{FetchRecord, FetcherError, JobSpec};
use super::runner::JobRunner;
use crate::server::metrics;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A registered job: its spec, its history, and the means to stop its runner.
struct Job {
    spec: JobSpec,
    history: ResultStore,
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Job {
    /// Raise the job's cancellation signal. Only ever called on a job that has
    /// just been taken out of the map, so each token is cancelled once.
    fn stop(self) -> JoinHandle<()> {
        debug!("Cancelling job: {}", self.spec.id);
        self.cancel_token.cancel();
        self.handle
    }
}

/// Owns every active fetch job.
///
/// Structural changes (`put`, `remove`, `shutdown`) take the map's write lock;
/// `list_specs` and the lookup in `get_history` take its read lock. History
/// itself is read through the job's own [`ResultStore`] after the map lock has
/// been released.
pub struct JobRegistry {
    fetcher: Arc<dyn Fetcher>,

    /// Active jobs by id.
    jobs: RwLock<HashMap<i64, Job>>,

    /// Last id handed out to a spec submitted without one.
    last_id: AtomicI64,

    /// Parent of every job's cancellation token.
    shutdown_token: CancellationToken,
}

impl JobRegistry {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_shutdown_token(fetcher, CancellationToken::new())
    }

    /// Create a registry whose jobs are all cancelled when `shutdown_token` is.
    pub fn with_shutdown_token(fetcher: Arc<dyn Fetcher>, shutdown_token: CancellationToken) -> Self {
        Self {
            fetcher,
            jobs: RwLock::new(HashMap::new()),
            last_id: AtomicI64::new(0),
            shutdown_token,
        }
    }

    fn next_id(&self) -> i64 {
        self.last_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install `spec`, replacing any job registered under the same id.
    ///
    /// A spec with `id == 0` gets the next id from the counter. The returned
    /// spec carries the final id. The previous job's history is discarded with it.
    /// Fails with [`FetcherError::ShuttingDown`] once the shutdown token is cancelled.
    pub async fn put(&self, mut spec: JobSpec) -> Result<JobSpec, FetcherError> {
        spec.validate()?;
        if spec.id == 0 {
            spec.id = self.next_id();
        }

        let history = ResultStore::new();
        let cancel_token = self.shutdown_token.child_token();

        let mut jobs = self.jobs.write().await;
        if self.shutdown_token.is_cancelled() {
            warn!("Rejecting job id: {}, registry is shutting down", spec.id);
            return Err(FetcherError::ShuttingDown);
        }

        if let Some(previous) = jobs.remove(&spec.id) {
            info!(
                "Replacing job id: {}, url: {} -> {}",
                spec.id, previous.spec.url, spec.url
            );
            previous.stop();
        }

        let runner = JobRunner::new(spec.clone(), Arc::clone(&self.fetcher), history.clone());
        let handle = tokio::spawn(runner.run(cancel_token.clone()));

        jobs.insert(
            spec.id,
            Job {
                spec: spec.clone(),
                history,
                cancel_token,
                handle,
            },
        );
        metrics::set_active_jobs(jobs.len());

        Ok(spec)
    }

    /// Stop and forget the job registered under `id`.
    pub async fn remove(&self, id: i64) -> Result<(), FetcherError> {
        let mut jobs = self.jobs.write().await;

        match jobs.remove(&id) {
            Some(job) => {
                info!("Removing job id: {}, url: {}", id, job.spec.url);
                job.stop();
                metrics::set_active_jobs(jobs.len());
                Ok(())
            }
            None => Err(FetcherError::NotFound(id)),
        }
    }

    /// Specs of all registered jobs, sorted by id.
    pub async fn list_specs(&self) -> Vec<JobSpec> {
        let jobs = self.jobs.read().await;
        let mut specs: Vec<JobSpec> = jobs.values().map(|job| job.spec.clone()).collect();
        specs.sort_by_key(|spec| spec.id);
        specs
    }

    /// Copy of the fetch history of job `id`.
    pub async fn get_history(&self, id: i64) -> Result<Vec<FetchRecord>, FetcherError> {
        let history = {
            let jobs = self.jobs.read().await;
            match jobs.get(&id) {
                Some(job) => job.history.clone(),
                None => return Err(FetcherError::NotFound(id)),
            }
        };

        Ok(history.snapshot().await)
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Stop every job and wait for all runners to exit.
    pub async fn shutdown(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut jobs = self.jobs.write().await;
            info!("Shutting down {} fetch jobs...", jobs.len());
            let handles = jobs.drain().map(|(_, job)| job.stop()).collect();
            metrics::set_active_jobs(0);
            handles
        };

        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                warn!("Fetch job task ended abnormally: {}", e);
            }
        }

        info!("All fetch jobs stopped");
    }
}
