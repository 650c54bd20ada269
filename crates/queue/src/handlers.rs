//! Publish job handlers.

use async_trait::async_trait;
use nadecast_common::{AppError, AppResult};
use nadecast_core::{PublishPayload, PublishService};
use serde_json::Value;

use crate::worker::JobHandler;

/// Handler for `create` jobs: runs the full publish choreography and
/// returns the created message ids.
pub struct CreatePostHandler {
    service: PublishService,
}

impl CreatePostHandler {
    /// Create a handler over the publish service.
    #[must_use]
    pub const fn new(service: PublishService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JobHandler for CreatePostHandler {
    async fn handle(&self, payload: Value) -> AppResult<Value> {
        let payload: PublishPayload = serde_json::from_value(payload)?;
        let result = self.service.create(&payload).await?;
        Ok(serde_json::to_value(result)?)
    }
}

/// Handler for `edit` jobs: re-renders the caption against the live post.
pub struct EditPostHandler {
    service: PublishService,
}

impl EditPostHandler {
    /// Create a handler over the publish service.
    #[must_use]
    pub const fn new(service: PublishService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JobHandler for EditPostHandler {
    async fn handle(&self, payload: Value) -> AppResult<Value> {
        let payload: PublishPayload = serde_json::from_value(payload)?;
        let post_id = payload.post_id.ok_or_else(|| {
            AppError::BadRequest(format!(
                "Edit payload for content {} is missing post_id",
                payload.content_id
            ))
        })?;
        self.service.edit(&payload, post_id).await?;
        Ok(Value::Null)
    }
}
