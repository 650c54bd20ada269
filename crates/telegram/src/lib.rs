//! Telegram messaging sessions for nadecast.
//!
//! This crate talks to the messaging platform:
//!
//! - **Sessions**: [`MessagingSession`] capability trait with the Bot API
//!   implementation [`BotApiSession`]
//! - **Rate limiting**: [`RateLimitedChannel`] retries flood-wait signals
//!   transparently and degrades silently on anything else
//!
//! Two sessions are configured per deployment: a primary session that sends
//! media bundles and a secondary session that edits captions.

pub mod channel;
pub mod session;
pub mod types;

pub use channel::RateLimitedChannel;
pub use session::{BotApiSession, MessagingSession};
pub use types::{ChannelError, MediaItem, MessageHandle};
