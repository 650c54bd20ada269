//! Worker loop.
//!
//! Pulls one job at a time from the broker and dispatches it to the handler
//! registered for its kind. Concurrency is exactly one by construction: the
//! next dequeue happens only after the previous job reached a terminal
//! state. A handler error becomes a stored `Failure` result; the loop
//! itself never stops on a job failure.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nadecast_common::AppResult;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::broker::JobBroker;
use crate::jobs::{Job, JobKind, JobOutcome};

/// A handler for one job kind.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Run the job. The returned value is stored as the success outcome.
    async fn handle(&self, payload: Value) -> AppResult<Value>;
}

/// Single-consumer job execution loop.
pub struct WorkerLoop {
    broker: Arc<dyn JobBroker>,
    handlers: HashMap<JobKind, Arc<dyn JobHandler>>,
    poll_interval: Duration,
    result_ttl: Duration,
}

impl WorkerLoop {
    /// Create a loop over the given broker.
    #[must_use]
    pub fn new(broker: Arc<dyn JobBroker>, poll_interval: Duration, result_ttl: Duration) -> Self {
        Self {
            broker,
            handlers: HashMap::new(),
            poll_interval,
            result_ttl,
        }
    }

    /// Register the handler for a job kind.
    #[must_use]
    pub fn with_handler(mut self, kind: JobKind, handler: Arc<dyn JobHandler>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Run forever. Cancel the task to stop.
    pub async fn run(&self) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "Worker loop started"
        );
        loop {
            match self.broker.dequeue().await {
                Ok(Some(job)) => self.process(job).await,
                Ok(None) => tokio::time::sleep(self.poll_interval).await,
                Err(e) => {
                    error!(error = %e, "Broker dequeue failed");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    async fn process(&self, job: Job) {
        // Re-delivery after a crashed worker restart: a terminal result
        // stored within TTL means the job already ran.
        match self.broker.fetch_result(&job.id).await {
            Ok(Some(_)) => {
                info!(job_id = %job.id, "Result already stored, skipping");
                return;
            }
            Ok(None) => {}
            Err(e) => warn!(job_id = %job.id, error = %e, "Result lookup failed, running anyway"),
        }

        info!(job_id = %job.id, kind = %job.kind, "Job running");

        let outcome = match self.handlers.get(&job.kind) {
            Some(handler) => match handler.handle(job.payload.clone()).await {
                Ok(value) => {
                    info!(job_id = %job.id, "Job succeeded");
                    JobOutcome::Success(value)
                }
                Err(e) => {
                    error!(job_id = %job.id, error = %e, "Job failed");
                    JobOutcome::Failure(e.to_string())
                }
            },
            None => {
                error!(job_id = %job.id, kind = %job.kind, "No handler registered");
                JobOutcome::Failure(format!("No handler registered for kind {}", job.kind))
            }
        };

        if let Err(e) = self
            .broker
            .store_result(&job.id, outcome, self.result_ttl)
            .await
        {
            error!(job_id = %job.id, error = %e, "Failed to store job result");
        }
    }
}
