//! Job and result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The two publish job kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Publish a new channel post.
    CreatePost,
    /// Edit the caption of an existing post.
    EditPost,
}

impl JobKind {
    /// Short string form used in job ids.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatePost => "create",
            Self::EditPost => "edit",
        }
    }

    /// Deterministic job id for a content item.
    ///
    /// The id is the idempotency key: re-submitting the same id while a
    /// prior job is queued or running coalesces into the existing entry.
    #[must_use]
    pub fn job_id(self, content_id: i64) -> String {
        format!("{}_{}", self.as_str(), content_id)
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queued publish job.
///
/// The payload is opaque to the broker; only the handler registered for
/// `kind` understands it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Idempotency key, `"{kind}_{content_id}"`.
    pub id: String,
    /// Which handler runs this job.
    pub kind: JobKind,
    /// Serialized handler input.
    pub payload: Value,
    /// When the job was enqueued.
    pub enqueued_at: DateTime<Utc>,
}

impl Job {
    /// Create a job for a content item.
    #[must_use]
    pub fn new(kind: JobKind, content_id: i64, payload: Value) -> Self {
        Self {
            id: kind.job_id(content_id),
            kind,
            payload,
            enqueued_at: Utc::now(),
        }
    }
}

/// Terminal outcome of a job.
///
/// Failures are stored as strings; structured errors never cross the
/// process boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum JobOutcome {
    /// Handler return value.
    Success(Value),
    /// Stringified handler error.
    Failure(String),
}

/// A stored job result, readable until its TTL expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    /// Id of the job this result belongs to.
    pub job_id: String,
    /// Terminal outcome.
    pub outcome: JobOutcome,
    /// When the result was stored.
    pub stored_at: DateTime<Utc>,
}

impl JobResult {
    /// Wrap an outcome with the current timestamp.
    #[must_use]
    pub fn new(job_id: String, outcome: JobOutcome) -> Self {
        Self {
            job_id,
            outcome,
            stored_at: Utc::now(),
        }
    }
}
