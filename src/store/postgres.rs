use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use crate::models::{NewSubmission, Snapshot, Submission};

use super::{publish, StoreError, SubmissionStore};

pub const CHANGE_CHANNEL: &str = "submissions_changed";

/// PostgreSQL-backed store. A trigger notifies `submissions_changed` on every
/// write, and a listener task reloads the full snapshot in response, so
/// changes made by other processes are published too.
pub struct PgStore {
    pool: PgPool,
    tx: watch::Sender<Arc<Snapshot>>,
    /// Serializes reloads so versions follow the order rows were read in.
    reload_lock: Mutex<u64>,
}

impl PgStore {
    /// Listen for change notifications, then load the initial snapshot.
    pub async fn connect(pool: PgPool) -> Result<Arc<Self>, StoreError> {
        let mut listener = PgListener::connect_with(&pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;

        let submissions = load_all(&pool).await?;
        let (tx, _) = watch::channel(Arc::new(Snapshot::new(0, submissions)));

        let store = Arc::new(Self {
            pool,
            tx,
            reload_lock: Mutex::new(0),
        });
        tokio::spawn(listen(Arc::downgrade(&store), listener));

        Ok(store)
    }

    async fn reload(&self) -> Result<Arc<Snapshot>, StoreError> {
        let mut version = self.reload_lock.lock().await;
        let submissions = load_all(&self.pool).await?;
        *version += 1;
        let snapshot = Arc::new(Snapshot::new(*version, submissions));
        publish(&self.tx, snapshot.clone());
        tracing::debug!(
            "Published snapshot v{} ({} submissions)",
            snapshot.version,
            snapshot.len()
        );
        Ok(snapshot)
    }

    /// Reload after a committed local write. A failure leaves the write in
    /// place; the change listener publishes it once the database answers.
    async fn republish(&self) {
        if let Err(e) = self.reload().await {
            tracing::warn!("Failed to republish after write: {e}");
        }
    }
}

async fn load_all(pool: &PgPool) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        r#"SELECT id, name, email, subject, message, "timestamp"
           FROM submissions ORDER BY seq"#,
    )
    .fetch_all(pool)
    .await
}

async fn listen(store: Weak<PgStore>, mut listener: PgListener) {
    loop {
        match listener.recv().await {
            Ok(notification) => {
                tracing::trace!("Change notification: {}", notification.payload());
            }
            Err(e) => {
                // recv() reconnects on the next call. Notifications sent while
                // disconnected are lost, so reload unconditionally below.
                tracing::warn!("Change listener error: {e}");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }

        let Some(store) = store.upgrade() else {
            break;
        };
        if let Err(e) = store.reload().await {
            tracing::error!("Failed to reload submissions: {e}");
        }
    }

    tracing::debug!("Change listener stopped");
}

#[async_trait]
impl SubmissionStore for PgStore {
    async fn push(&self, new: NewSubmission) -> Result<Submission, StoreError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"INSERT INTO submissions (id, name, email, subject, message, "timestamp")
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, name, email, subject, message, "timestamp""#,
        )
        .bind(Uuid::now_v7())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.subject)
        .bind(&new.message)
        .bind(new.timestamp)
        .fetch_one(&self.pool)
        .await?;

        self.republish().await;
        Ok(submission)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let existed = result.rows_affected() > 0;
        if existed {
            self.republish().await;
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
