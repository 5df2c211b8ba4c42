use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::models::{NewSubmission, Snapshot, Submission};

use super::{StoreError, SubmissionStore};

/// In-process store. The watch channel owns the current snapshot, so each
/// mutation is a copy-on-write swap under the channel's lock.
pub struct MemoryStore {
    tx: watch::Sender<Arc<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_submissions(Vec::new())
    }

    /// Start from existing records, kept in the given order.
    pub fn with_submissions(submissions: Vec<Submission>) -> Self {
        let (tx, _) = watch::channel(Arc::new(Snapshot::new(0, submissions)));
        Self { tx }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn push(&self, new: NewSubmission) -> Result<Submission, StoreError> {
        let submission = new.with_id(Uuid::now_v7());
        let stored = submission.clone();

        self.tx.send_modify(|current| {
            let mut records = Vec::with_capacity(current.len() + 1);
            records.extend(current.submissions.iter().cloned());
            records.push(stored);
            *current = Arc::new(Snapshot::new(current.version + 1, records));
        });

        tracing::debug!("Stored submission {}", submission.id);
        Ok(submission)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let existed = self.tx.send_if_modified(|current| {
            if current.get(id).is_none() {
                return false;
            }
            let records = current
                .submissions
                .iter()
                .filter(|s| s.id != id)
                .cloned()
                .collect();
            *current = Arc::new(Snapshot::new(current.version + 1, records));
            true
        });

        if existed {
            tracing::debug!("Deleted submission {id}");
        }
        Ok(existed)
    }

    async fn snapshot(&self) -> Result<Arc<Snapshot>, StoreError> {
        Ok(self.tx.borrow().clone())
    }

    fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }
}
