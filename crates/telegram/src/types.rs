//! Messaging channel types.

use thiserror::Error;

/// Handle to a message created or edited on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandle {
    /// Platform message id within the target chat.
    pub message_id: i64,
}

impl MessageHandle {
    /// Create a handle from a raw message id.
    #[must_use]
    pub const fn new(message_id: i64) -> Self {
        Self { message_id }
    }
}

/// A single item of a media bundle, in send order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaItem {
    /// A video clip, optionally with a caption.
    Video {
        /// Platform file reference.
        file_id: String,
        /// Caption attached at send time.
        caption: Option<String>,
    },
    /// A photo.
    Photo {
        /// Platform file reference.
        file_id: String,
    },
}

impl MediaItem {
    /// Video item with a caption.
    #[must_use]
    pub const fn video(file_id: String, caption: Option<String>) -> Self {
        Self::Video { file_id, caption }
    }

    /// Photo item.
    #[must_use]
    pub const fn photo(file_id: String) -> Self {
        Self::Photo { file_id }
    }
}

/// Errors surfaced by a messaging session.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The platform asked us to wait before retrying.
    #[error("Rate limited, retry after {retry_after}s")]
    RateLimited {
        /// Server-specified wait in seconds.
        retry_after: u64,
    },

    /// The requested change is a no-op (e.g. editing to identical content).
    #[error("Content not modified")]
    NotModified,

    /// Any other platform rejection or transport failure.
    #[error("Platform error: {0}")]
    Platform(String),
}

impl From<reqwest::Error> for ChannelError {
    fn from(err: reqwest::Error) -> Self {
        Self::Platform(err.to_string())
    }
}
