use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Milliseconds since the Unix epoch, assigned by the submitting side.
    pub timestamp: i64,
}

impl Submission {
    /// The submission time in the given zone. Timestamps outside chrono's
    /// representable range yield `None`.
    pub fn time_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_millis_opt(self.timestamp).single()
    }

    /// Text after the first `@` of the email, up to the next `@` if any.
    pub fn email_domain(&self) -> Option<&str> {
        self.email.split('@').nth(1)
    }
}

/// A submission as handed to the store, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub timestamp: i64,
}

impl NewSubmission {
    pub fn with_id(self, id: Uuid) -> Submission {
        Submission {
            id,
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            timestamp: self.timestamp,
        }
    }
}

/// Immutable view of the whole collection, in store insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub version: u64,
    pub submissions: Vec<Submission>,
}

impl Snapshot {
    pub fn new(version: u64, submissions: Vec<Submission>) -> Self {
        Self {
            version,
            submissions,
        }
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == id)
    }
}
