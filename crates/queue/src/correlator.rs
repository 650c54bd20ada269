//! Caller-side result correlation.
//!
//! The request-serving process enqueues a job under its deterministic id
//! and blocks, bounded by a timeout, until the worker stores a result for
//! that id. A timeout abandons only the waiter; the job runs to completion
//! and its result stays fetchable within TTL.

use std::sync::Arc;
use std::time::Duration;

use nadecast_common::{AppError, AppResult};
use nadecast_core::{PublishPayload, PublishResult};
use serde_json::Value;
use tracing::{debug, info};

use crate::broker::JobBroker;
use crate::jobs::{Job, JobKind, JobOutcome, JobResult};

/// Submits publish jobs and waits for their results.
#[derive(Clone)]
pub struct ResultCorrelator {
    broker: Arc<dyn JobBroker>,
    default_timeout: Duration,
}

impl ResultCorrelator {
    /// Create a correlator over the broker.
    #[must_use]
    pub fn new(broker: Arc<dyn JobBroker>, default_timeout: Duration) -> Self {
        Self {
            broker,
            default_timeout,
        }
    }

    /// Enqueue a job and wait for its result.
    pub async fn submit_and_wait(
        &self,
        kind: JobKind,
        content_id: i64,
        payload: Value,
        timeout: Duration,
    ) -> AppResult<Value> {
        let job = Job::new(kind, content_id, payload);
        let job_id = job.id.clone();

        info!(job_id = %job_id, "Submitting job");
        let fresh = self.broker.enqueue(job).await?;
        if !fresh {
            debug!(job_id = %job_id, "Coalesced into an existing job, awaiting its result");
        }

        match self.broker.await_result(&job_id, timeout).await? {
            None => {
                info!(job_id = %job_id, "Job wait timed out, abandoning the waiter");
                Err(AppError::JobTimeout)
            }
            Some(JobResult {
                outcome: JobOutcome::Failure(detail),
                ..
            }) => Err(AppError::JobFailed(detail)),
            Some(JobResult {
                outcome: JobOutcome::Success(value),
                ..
            }) => Ok(value),
        }
    }

    /// Publish a lineup and return the created message ids.
    pub async fn publish(&self, payload: &PublishPayload) -> AppResult<PublishResult> {
        let value = self
            .submit_and_wait(
                JobKind::CreatePost,
                payload.content_id,
                serde_json::to_value(payload)?,
                self.default_timeout,
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Edit the live post of a lineup.
    pub async fn edit(&self, payload: &PublishPayload) -> AppResult<()> {
        if payload.post_id.is_none() {
            return Err(AppError::BadRequest(format!(
                "Content {} has no live post to edit",
                payload.content_id
            )));
        }
        self.submit_and_wait(
            JobKind::EditPost,
            payload.content_id,
            serde_json::to_value(payload)?,
            self.default_timeout,
        )
        .await?;
        Ok(())
    }
}
