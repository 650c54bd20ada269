//! Rate-limit-aware channel wrapper.
//!
//! Wraps a single [`MessagingSession`] and retries flood-wait signals with
//! the server-specified delay, unbounded. Any other platform failure is
//! logged and swallowed; callers observe an absent handle instead of an
//! error and must treat it as a silently failed step.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::session::MessagingSession;
use crate::types::{ChannelError, MediaItem, MessageHandle};

/// A messaging session with transparent flood-wait retries.
#[derive(Clone)]
pub struct RateLimitedChannel {
    session: Arc<dyn MessagingSession>,
}

impl RateLimitedChannel {
    /// Wrap a session.
    #[must_use]
    pub fn new(session: Arc<dyn MessagingSession>) -> Self {
        Self { session }
    }

    /// Send a media bundle, retrying on rate limits.
    ///
    /// Returns an empty vector if the send ultimately failed.
    pub async fn send_media_bundle(&self, chat_id: i64, items: &[MediaItem]) -> Vec<MessageHandle> {
        loop {
            match self.session.send_media_bundle(chat_id, items).await {
                Ok(handles) => return handles,
                Err(ChannelError::RateLimited { retry_after }) => {
                    Self::flood_wait(retry_after).await;
                }
                Err(ChannelError::NotModified) => return Vec::new(),
                Err(e) => {
                    error!(chat_id = chat_id, error = %e, "Media bundle send failed");
                    return Vec::new();
                }
            }
        }
    }

    /// Edit a message caption, retrying on rate limits.
    ///
    /// Returns `None` both for a platform no-op (content unchanged) and for
    /// a silently failed edit; the two are not distinguishable here.
    pub async fn edit_caption(
        &self,
        chat_id: i64,
        message_id: i64,
        caption: &str,
    ) -> Option<MessageHandle> {
        loop {
            match self
                .session
                .edit_caption(chat_id, message_id, caption)
                .await
            {
                Ok(handle) => return Some(handle),
                Err(ChannelError::RateLimited { retry_after }) => {
                    Self::flood_wait(retry_after).await;
                }
                Err(ChannelError::NotModified) => return None,
                Err(e) => {
                    error!(
                        chat_id = chat_id,
                        message_id = message_id,
                        error = %e,
                        "Caption edit failed"
                    );
                    return None;
                }
            }
        }
    }

    // One second past the server-specified minimum.
    async fn flood_wait(retry_after: u64) {
        info!(retry_after = retry_after, "Rate limited, waiting");
        tokio::time::sleep(Duration::from_secs(retry_after + 1)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with the given errors in order, then succeeds.
    struct ScriptedSession {
        failures: std::sync::Mutex<Vec<ChannelError>>,
        calls: AtomicU32,
    }

    impl ScriptedSession {
        fn new(failures: Vec<ChannelError>) -> Self {
            Self {
                failures: std::sync::Mutex::new(failures),
                calls: AtomicU32::new(0),
            }
        }

        fn next(&self) -> Option<ChannelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut failures = self.failures.lock().expect("lock poisoned");
            if failures.is_empty() {
                None
            } else {
                Some(failures.remove(0))
            }
        }
    }

    #[async_trait]
    impl MessagingSession for ScriptedSession {
        async fn send_media_bundle(
            &self,
            _chat_id: i64,
            items: &[MediaItem],
        ) -> Result<Vec<MessageHandle>, ChannelError> {
            match self.next() {
                Some(err) => Err(err),
                None => Ok((0..items.len() as i64).map(MessageHandle::new).collect()),
            }
        }

        async fn edit_caption(
            &self,
            _chat_id: i64,
            message_id: i64,
            _caption: &str,
        ) -> Result<MessageHandle, ChannelError> {
            match self.next() {
                Some(err) => Err(err),
                None => Ok(MessageHandle::new(message_id)),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn send_retries_after_rate_limit_signal() {
        let session = Arc::new(ScriptedSession::new(vec![ChannelError::RateLimited {
            retry_after: 2,
        }]));
        let channel = RateLimitedChannel::new(session.clone());

        let started = tokio::time::Instant::now();
        let handles = channel
            .send_media_bundle(1, &[MediaItem::photo("p".to_string())])
            .await;

        assert_eq!(handles.len(), 1, "second attempt should succeed");
        assert_eq!(session.calls.load(Ordering::SeqCst), 2);
        assert!(
            started.elapsed() >= Duration::from_secs(2),
            "must wait at least the server-specified delay"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn send_survives_repeated_rate_limits() {
        let session = Arc::new(ScriptedSession::new(vec![
            ChannelError::RateLimited { retry_after: 1 },
            ChannelError::RateLimited { retry_after: 1 },
            ChannelError::RateLimited { retry_after: 1 },
        ]));
        let channel = RateLimitedChannel::new(session.clone());

        let handles = channel
            .send_media_bundle(1, &[MediaItem::photo("p".to_string())])
            .await;

        assert_eq!(handles.len(), 1);
        assert_eq!(session.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn edit_treats_not_modified_as_quiet_success() {
        let session = Arc::new(ScriptedSession::new(vec![ChannelError::NotModified]));
        let channel = RateLimitedChannel::new(session.clone());

        let handle = channel.edit_caption(1, 42, "same text").await;

        assert!(handle.is_none());
        assert_eq!(session.calls.load(Ordering::SeqCst), 1, "no retry on no-op");
    }

    #[tokio::test]
    async fn platform_errors_are_swallowed_not_raised() {
        let session = Arc::new(ScriptedSession::new(vec![ChannelError::Platform(
            "chat not found".to_string(),
        )]));
        let channel = RateLimitedChannel::new(session.clone());

        let handles = channel
            .send_media_bundle(1, &[MediaItem::photo("p".to_string())])
            .await;
        assert!(handles.is_empty(), "failed send yields an absent result");

        let session = Arc::new(ScriptedSession::new(vec![ChannelError::Platform(
            "message to edit not found".to_string(),
        )]));
        let channel = RateLimitedChannel::new(session);
        let handle = channel.edit_caption(1, 42, "text").await;
        assert!(handle.is_none());
    }
}
