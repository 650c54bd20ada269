//! Job broker: a durable FIFO queue with id-keyed dedupe and TTL'd results.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fred::clients::Client as RedisClient;
use fred::interfaces::{KeysInterface, ListInterface};
use fred::types::{Expiration, SetOptions};
use nadecast_common::{AppError, AppResult};
use tracing::{debug, warn};

use crate::jobs::{Job, JobOutcome, JobResult};

/// How often `await_result` re-checks the result store.
const AWAIT_POLL_STEP: Duration = Duration::from_millis(250);

/// How long an in-flight marker survives without a stored result. Covers a
/// worker that crashed mid-job; until it expires, re-submissions of the same
/// id coalesce.
const IN_FLIGHT_EXPIRY_SECS: i64 = 300;

/// Durable hand-off between the request-serving process and the worker.
///
/// Delivery is at-least-once to a single consumer. Enqueueing an id that is
/// already queued or running does not create a second entry.
#[async_trait]
pub trait JobBroker: Send + Sync {
    /// Enqueue a job. Returns `false` if an entry with the same id is
    /// already queued or running (the submission coalesced into it).
    async fn enqueue(&self, job: Job) -> AppResult<bool>;

    /// Pop the next job, if any. Never blocks; the worker paces itself.
    async fn dequeue(&self) -> AppResult<Option<Job>>;

    /// Store a terminal outcome, readable for `ttl`, and release the job id
    /// for future submissions.
    async fn store_result(&self, job_id: &str, outcome: JobOutcome, ttl: Duration) -> AppResult<()>;

    /// Fetch a stored result. Expired results read as `None`, the same as
    /// "never stored".
    async fn fetch_result(&self, job_id: &str) -> AppResult<Option<JobResult>>;

    /// Wait for a result to materialize, up to `timeout`.
    ///
    /// `None` means the wait timed out; the job itself keeps running and its
    /// result stays fetchable by id within TTL.
    async fn await_result(&self, job_id: &str, timeout: Duration) -> AppResult<Option<JobResult>> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(result) = self.fetch_result(job_id).await? {
                return Ok(Some(result));
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(AWAIT_POLL_STEP.min(deadline - now)).await;
        }
    }
}

/// Redis-backed broker.
///
/// Layout under the configured prefix: a list holding serialized jobs in
/// FIFO order, one in-flight marker per job id, and one result key per job
/// id with the result TTL.
#[derive(Clone)]
pub struct RedisJobBroker {
    redis: Arc<RedisClient>,
    prefix: String,
}

impl RedisJobBroker {
    /// Create a broker on an already connected client.
    #[must_use]
    pub const fn new(redis: Arc<RedisClient>, prefix: String) -> Self {
        Self { redis, prefix }
    }

    fn queue_key(&self) -> String {
        format!("{}:queue", self.prefix)
    }

    fn in_flight_key(&self, job_id: &str) -> String {
        format!("{}:in-flight:{job_id}", self.prefix)
    }

    fn result_key(&self, job_id: &str) -> String {
        format!("{}:result:{job_id}", self.prefix)
    }
}

#[async_trait]
impl JobBroker for RedisJobBroker {
    async fn enqueue(&self, job: Job) -> AppResult<bool> {
        let serialized = serde_json::to_string(&job)?;

        let marker: Option<String> = self
            .redis
            .set(
                self.in_flight_key(&job.id),
                "1",
                Some(Expiration::EX(IN_FLIGHT_EXPIRY_SECS)),
                Some(SetOptions::NX),
                false,
            )
            .await
            .map_err(|e| AppError::Redis(e.to_string()))?;

        if marker.is_none() {
            debug!(job_id = %job.id, "Job already queued or running, coalescing");
            return Ok(false);
        }

        if let Err(e) = self
            .redis
            .rpush::<(), _, _>(self.queue_key(), serialized)
            .await
        {
            // The marker must not outlive a failed queue insert; until it
            // expires, every re-submission of this id would coalesce into a
            // job that does not exist.
            if let Err(del_err) = self.redis.del::<(), _>(self.in_flight_key(&job.id)).await {
                warn!(job_id = %job.id, error = %del_err, "Failed to release in-flight marker");
            }
            return Err(AppError::Redis(e.to_string()));
        }

        debug!(job_id = %job.id, kind = %job.kind, "Job enqueued");
        Ok(true)
    }

    async fn dequeue(&self) -> AppResult<Option<Job>> {
        let raw: Option<String> = self
            .redis
            .lpop(self.queue_key(), None)
            .await
            .map_err(|e| AppError::Redis(e.to_string()))?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn store_result(
        &self,
        job_id: &str,
        outcome: JobOutcome,
        ttl: Duration,
    ) -> AppResult<()> {
        let result = JobResult::new(job_id.to_string(), outcome);
        let serialized = serde_json::to_string(&result)?;

        self.redis
            .set::<(), _, _>(
                self.result_key(job_id),
                serialized,
                Some(Expiration::EX(ttl.as_secs() as i64)),
                None,
                false,
            )
            .await
            .map_err(|e| AppError::Redis(e.to_string()))?;

        self.redis
            .del::<(), _>(self.in_flight_key(job_id))
            .await
            .map_err(|e| AppError::Redis(e.to_string()))?;

        Ok(())
    }

    async fn fetch_result(&self, job_id: &str) -> AppResult<Option<JobResult>> {
        let raw: Option<String> = self
            .redis
            .get(self.result_key(job_id))
            .await
            .map_err(|e| AppError::Redis(e.to_string()))?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}
