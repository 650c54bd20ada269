//! Publish endpoints.

use axum::{Json, Router, extract::State, routing::post};
use nadecast_common::AppResult;
use nadecast_core::{PublishPayload, PublishResult};
use serde::Serialize;
use tracing::info;

use crate::middleware::AppState;

/// Created message ids, to be persisted onto the content record.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub post_id: i64,
    pub setup_photo_msg_id: i64,
    pub finish_photo_msg_id: i64,
}

impl From<PublishResult> for PublishResponse {
    fn from(result: PublishResult) -> Self {
        Self {
            post_id: result.post_id,
            setup_photo_msg_id: result.setup_photo_msg_id,
            finish_photo_msg_id: result.finish_photo_msg_id,
        }
    }
}

/// Edit acknowledgement.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResponse {
    pub post_id: i64,
}

/// Build the publish router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/publish", post(create_post))
        .route("/publish/edit", post(edit_post))
}

/// Publish a lineup as a new channel post.
///
/// On any error the caller must roll back the content-record transaction;
/// the record must not reference a post that was never published.
async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<PublishPayload>,
) -> AppResult<Json<PublishResponse>> {
    info!(content_id = payload.content_id, "Publish requested");
    let result = state.correlator.publish(&payload).await?;
    Ok(Json(result.into()))
}

/// Re-render and push the caption of an existing post.
async fn edit_post(
    State(state): State<AppState>,
    Json(payload): Json<PublishPayload>,
) -> AppResult<Json<EditResponse>> {
    info!(
        content_id = payload.content_id,
        post_id = payload.post_id,
        "Edit requested"
    );
    state.correlator.edit(&payload).await?;
    Ok(Json(EditResponse {
        post_id: payload.post_id.unwrap_or_default(),
    }))
}
