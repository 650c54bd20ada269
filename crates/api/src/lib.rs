//! HTTP API layer for nadecast.
//!
//! A thin surface over the publish pipeline: it accepts a finished
//! [`nadecast_core::PublishPayload`], submits the job, and returns the
//! created message ids. Persisting those ids onto the content record (and
//! rolling back on failure) stays with the caller's transaction.
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod middleware;

pub use endpoints::router;
pub use middleware::AppState;
