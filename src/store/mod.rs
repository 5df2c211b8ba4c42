pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::{NewSubmission, Snapshot, Submission};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(err) => write!(f, "Database error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

/// Keyed submission collection with full-snapshot change notification.
///
/// Every successful mutation publishes a new snapshot whose `version` is
/// strictly greater than any previously published one. Subscribers may miss
/// intermediate snapshots but never observe them out of order.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Store a new record; the store assigns its id.
    async fn push(&self, new: NewSubmission) -> Result<Submission, StoreError>;

    /// Remove a record. Returns whether the id existed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Current state of the collection.
    async fn snapshot(&self) -> Result<Arc<Snapshot>, StoreError>;

    fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>>;
}

pub type SharedStore = Arc<dyn SubmissionStore>;

/// Deliver every new snapshot of `store` to `on_change`.
///
/// The current snapshot is delivered first. The task ends when the store is
/// dropped.
pub fn subscribe_with<F>(store: &SharedStore, mut on_change: F) -> JoinHandle<()>
where
    F: FnMut(Arc<Snapshot>) + Send + 'static,
{
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            on_change(snapshot);
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}

/// Publish `next` unless a newer snapshot is already out.
pub(crate) fn publish(tx: &watch::Sender<Arc<Snapshot>>, next: Arc<Snapshot>) {
    tx.send_if_modified(|current| {
        if next.version > current.version {
            *current = next;
            true
        } else {
            false
        }
    });
}
