//! Background publish job pipeline for nadecast.
//!
//! This crate carries a publish request from the request-serving process to
//! the single worker process and back:
//!
//! - **Jobs**: [`Job`], [`JobKind`], [`JobOutcome`], [`JobResult`]
//! - **Broker**: [`JobBroker`] trait with Redis and in-memory backends
//! - **Worker**: [`WorkerLoop`], strictly one job in flight at a time
//! - **Handlers**: [`CreatePostHandler`], [`EditPostHandler`]
//! - **Correlation**: [`ResultCorrelator`], a bounded wait on the job result
//!
//! One logical worker consumes the queue; at most one job per content id
//! executes at any instant because the worker's concurrency bound is 1.

pub mod broker;
pub mod correlator;
pub mod handlers;
pub mod jobs;
pub mod memory;
pub mod worker;

pub use broker::{JobBroker, RedisJobBroker};
pub use correlator::ResultCorrelator;
pub use handlers::{CreatePostHandler, EditPostHandler};
pub use jobs::{Job, JobKind, JobOutcome, JobResult};
pub use memory::MemoryJobBroker;
pub use worker::{JobHandler, WorkerLoop};
