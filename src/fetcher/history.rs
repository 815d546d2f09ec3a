use super::job::FetchRecord;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Append-only fetch history of a single job.
///
/// Cloning the store clones the handle, not the records. The lock is private to
/// the job, so reading one job's history never waits on the registry or on
/// other jobs.
#[derive(Clone, Default)]
pub struct ResultStore {
    records: Arc<RwLock<Vec<FetchRecord>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::with_capacity(16))),
        }
    }

    pub async fn append(&self, record: FetchRecord) {
        self.records.write().await.push(record);
    }

    /// Copy of all records in insertion order.
    pub async fn snapshot(&self) -> Vec<FetchRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
