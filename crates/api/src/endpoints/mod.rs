//! API endpoints.

mod publish;

use axum::Router;

use crate::middleware::AppState;

/// Build the API router.
#[must_use]
pub fn router() -> Router<AppState> {
    Router::new().merge(publish::router())
}
