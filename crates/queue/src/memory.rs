//! In-memory broker for tests and single-process deployments.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use nadecast_common::AppResult;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::broker::JobBroker;
use crate::jobs::{Job, JobOutcome, JobResult};

#[derive(Default)]
struct State {
    queue: VecDeque<Job>,
    in_flight: HashSet<String>,
    results: HashMap<String, (JobResult, Instant)>,
}

/// Same contract as the Redis broker, on process-local state.
#[derive(Default)]
pub struct MemoryJobBroker {
    state: Mutex<State>,
}

impl MemoryJobBroker {
    /// Create an empty broker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued (not yet dequeued) jobs.
    pub async fn queued_len(&self) -> usize {
        self.state.lock().await.queue.len()
    }
}

#[async_trait]
impl JobBroker for MemoryJobBroker {
    async fn enqueue(&self, job: Job) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if state.in_flight.contains(&job.id) {
            return Ok(false);
        }
        state.in_flight.insert(job.id.clone());
        state.queue.push_back(job);
        Ok(true)
    }

    async fn dequeue(&self) -> AppResult<Option<Job>> {
        // The id stays in-flight until the result is stored.
        Ok(self.state.lock().await.queue.pop_front())
    }

    async fn store_result(
        &self,
        job_id: &str,
        outcome: JobOutcome,
        ttl: Duration,
    ) -> AppResult<()> {
        let result = JobResult::new(job_id.to_string(), outcome);
        let mut state = self.state.lock().await;
        state
            .results
            .insert(job_id.to_string(), (result, Instant::now() + ttl));
        state.in_flight.remove(job_id);
        Ok(())
    }

    async fn fetch_result(&self, job_id: &str) -> AppResult<Option<JobResult>> {
        let mut state = self.state.lock().await;
        let expired = matches!(
            state.results.get(job_id),
            Some((_, expires_at)) if *expires_at <= Instant::now()
        );
        if expired {
            state.results.remove(job_id);
            return Ok(None);
        }
        Ok(state.results.get(job_id).map(|(result, _)| result.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobKind;
    use serde_json::json;

    #[tokio::test]
    async fn same_id_coalesces_until_result_is_stored() {
        let broker = MemoryJobBroker::new();

        let first = broker
            .enqueue(Job::new(JobKind::CreatePost, 1, json!({})))
            .await
            .expect("enqueue");
        let second = broker
            .enqueue(Job::new(JobKind::CreatePost, 1, json!({})))
            .await
            .expect("enqueue");

        assert!(first);
        assert!(!second, "duplicate id must coalesce");
        assert_eq!(broker.queued_len().await, 1);

        // Still running after dequeue: a third submission coalesces too.
        let job = broker.dequeue().await.expect("dequeue").expect("job");
        let third = broker
            .enqueue(Job::new(JobKind::CreatePost, 1, json!({})))
            .await
            .expect("enqueue");
        assert!(!third);

        broker
            .store_result(&job.id, JobOutcome::Success(json!(null)), Duration::from_secs(30))
            .await
            .expect("store");

        let fourth = broker
            .enqueue(Job::new(JobKind::CreatePost, 1, json!({})))
            .await
            .expect("enqueue");
        assert!(fourth, "id is released once a result is stored");
    }

    #[tokio::test]
    async fn distinct_ids_dequeue_in_insertion_order() {
        let broker = MemoryJobBroker::new();
        broker
            .enqueue(Job::new(JobKind::CreatePost, 1, json!({})))
            .await
            .expect("enqueue");
        broker
            .enqueue(Job::new(JobKind::EditPost, 2, json!({})))
            .await
            .expect("enqueue");

        let first = broker.dequeue().await.expect("dequeue").expect("job");
        let second = broker.dequeue().await.expect("dequeue").expect("job");
        assert_eq!(first.id, "create_1");
        assert_eq!(second.id, "edit_2");
        assert!(broker.dequeue().await.expect("dequeue").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_results_read_as_not_found() {
        let broker = MemoryJobBroker::new();
        broker
            .store_result(
                "create_9",
                JobOutcome::Success(json!({"post_id": 1})),
                Duration::from_secs(30),
            )
            .await
            .expect("store");

        assert!(broker.fetch_result("create_9").await.expect("fetch").is_some());

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(
            broker.fetch_result("create_9").await.expect("fetch").is_none(),
            "expired result is indistinguishable from never stored"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn await_result_times_out_without_a_result() {
        let broker = MemoryJobBroker::new();
        let waited = broker
            .await_result("create_1", Duration::from_secs(2))
            .await
            .expect("await");
        assert!(waited.is_none());
    }
}
