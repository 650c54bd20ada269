//! Bot API messaging session.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::types::{ChannelError, MediaItem, MessageHandle};

/// One outbound messaging session.
///
/// Both the bundle-sending and caption-editing sessions implement this
/// capability interface; callers pick a session per operation.
#[async_trait]
pub trait MessagingSession: Send + Sync {
    /// Send a multi-item media bundle in one call, returning one handle per
    /// item in bundle order.
    async fn send_media_bundle(
        &self,
        chat_id: i64,
        items: &[MediaItem],
    ) -> Result<Vec<MessageHandle>, ChannelError>;

    /// Edit the caption of an existing message.
    async fn edit_caption(
        &self,
        chat_id: i64,
        message_id: i64,
        caption: &str,
    ) -> Result<MessageHandle, ChannelError>;
}

/// Telegram Bot API session.
#[derive(Clone)]
pub struct BotApiSession {
    http_client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ApiAnswer<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    parameters: Option<ResponseParameters>,
}

#[derive(Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

#[derive(Deserialize)]
struct Message {
    message_id: i64,
}

impl BotApiSession {
    /// Create a session for the given bot token.
    ///
    /// # Panics
    /// Panics if the HTTP client fails to build.
    #[must_use]
    #[allow(clippy::expect_used)] // Client build only fails with incompatible TLS settings
    pub fn new(token: &str) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: format!("https://api.telegram.org/bot{token}"),
        }
    }

    /// Create a session against a custom API server (used in tests).
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url,
        }
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &Value,
    ) -> Result<T, ChannelError> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(method = method, "Calling Bot API");

        let response = self.http_client.post(&url).json(body).send().await?;
        let answer: ApiAnswer<T> = response.json().await?;

        if answer.ok {
            return answer
                .result
                .ok_or_else(|| ChannelError::Platform("Missing result in API answer".to_string()));
        }

        let description = answer.description.unwrap_or_else(|| "unknown".to_string());

        if let Some(retry_after) = answer.parameters.and_then(|p| p.retry_after) {
            return Err(ChannelError::RateLimited { retry_after });
        }
        if description.contains("message is not modified") {
            return Err(ChannelError::NotModified);
        }

        Err(ChannelError::Platform(description))
    }
}

fn media_item_json(item: &MediaItem) -> Value {
    match item {
        MediaItem::Video { file_id, caption } => {
            let mut value = json!({
                "type": "video",
                "media": file_id,
            });
            if let Some(caption) = caption {
                value["caption"] = json!(caption);
            }
            value
        }
        MediaItem::Photo { file_id } => json!({
            "type": "photo",
            "media": file_id,
        }),
    }
}

#[async_trait]
impl MessagingSession for BotApiSession {
    async fn send_media_bundle(
        &self,
        chat_id: i64,
        items: &[MediaItem],
    ) -> Result<Vec<MessageHandle>, ChannelError> {
        let media: Vec<Value> = items.iter().map(media_item_json).collect();
        let body = json!({
            "chat_id": chat_id,
            "media": media,
        });

        let messages: Vec<Message> = self.call("sendMediaGroup", &body).await?;
        Ok(messages
            .into_iter()
            .map(|m| MessageHandle::new(m.message_id))
            .collect())
    }

    async fn edit_caption(
        &self,
        chat_id: i64,
        message_id: i64,
        caption: &str,
    ) -> Result<MessageHandle, ChannelError> {
        let body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "caption": caption,
            "parse_mode": "HTML",
        });

        let message: Message = self.call("editMessageCaption", &body).await?;
        Ok(MessageHandle::new(message.message_id))
    }
}
