//! Publish choreography.
//!
//! Creating a post takes two sessions: the primary session sends the media
//! bundle (video + setup photo + finish photo in one call), then after a
//! short settle delay the secondary session edits the caption of the first
//! bundle item to the rendered description. Edits re-render the caption and
//! push it against the existing post; no media is re-sent.

use std::time::Duration;

use nadecast_common::{AppError, AppResult};
use nadecast_telegram::{MediaItem, RateLimitedChannel};
use tracing::{info, warn};

use crate::caption::render_caption;
use crate::domain::{ChannelLinks, PublishPayload, PublishResult};

/// Placeholder caption shown on the video until the real caption lands.
const UPLOADING_CAPTION: &str = "Uploading...";

/// Service driving the two-session publish choreography.
#[derive(Clone)]
pub struct PublishService {
    primary: RateLimitedChannel,
    secondary: RateLimitedChannel,
    channel_id: i64,
    settle_delay: Duration,
    links: ChannelLinks,
}

impl PublishService {
    /// Create a new publish service.
    #[must_use]
    pub const fn new(
        primary: RateLimitedChannel,
        secondary: RateLimitedChannel,
        channel_id: i64,
        settle_delay: Duration,
        links: ChannelLinks,
    ) -> Self {
        Self {
            primary,
            secondary,
            channel_id,
            settle_delay,
            links,
        }
    }

    /// Publish a lineup as a new channel post.
    ///
    /// Returns the three message ids in bundle order. Fails if the bundle
    /// send degraded to an absent result; a failed caption edit is logged
    /// and tolerated (the post exists either way).
    pub async fn create(&self, payload: &PublishPayload) -> AppResult<PublishResult> {
        let caption = render_caption(payload, &self.links);

        let items = [
            MediaItem::video(
                payload.media.video.clone(),
                Some(UPLOADING_CAPTION.to_string()),
            ),
            MediaItem::photo(payload.media.setup_photo.clone()),
            MediaItem::photo(payload.media.finish_photo.clone()),
        ];

        let handles = self
            .primary
            .send_media_bundle(self.channel_id, &items)
            .await;

        let &[post, setup, finish] = handles.as_slice() else {
            return Err(AppError::ExternalService(format!(
                "Media bundle send for content {} returned {} messages, expected {}",
                payload.content_id,
                handles.len(),
                items.len(),
            )));
        };

        // Let the platform finish processing the bundle before editing it.
        tokio::time::sleep(self.settle_delay).await;

        let edited = self
            .secondary
            .edit_caption(self.channel_id, post.message_id, &caption)
            .await;
        if edited.is_none() {
            warn!(
                content_id = payload.content_id,
                post_id = post.message_id,
                "Caption edit produced no handle"
            );
        }

        info!(
            content_id = payload.content_id,
            post_id = post.message_id,
            "Lineup published"
        );

        Ok(PublishResult {
            post_id: post.message_id,
            setup_photo_msg_id: setup.message_id,
            finish_photo_msg_id: finish.message_id,
        })
    }

    /// Push a freshly rendered caption onto an existing post.
    pub async fn edit(&self, payload: &PublishPayload, existing_post_id: i64) -> AppResult<()> {
        let caption = render_caption(payload, &self.links);

        let edited = self
            .secondary
            .edit_caption(self.channel_id, existing_post_id, &caption)
            .await;
        if edited.is_none() {
            // Unchanged content and a silently failed edit are not
            // distinguishable at this layer.
            warn!(
                content_id = payload.content_id,
                post_id = existing_post_id,
                "Caption edit produced no handle"
            );
        }

        info!(
            content_id = payload.content_id,
            post_id = existing_post_id,
            "Lineup post edited"
        );

        Ok(())
    }
}
