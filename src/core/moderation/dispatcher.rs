// Notification dispatcher - best-effort wrapper around the chat platform's outbound calls.
//
// Every call can fail (missing permissions, message already gone, network). The dispatcher
// logs the failure and hands back the `Result` so callers can record what happened without
// aborting the rest of the pipeline.

use async_trait::async_trait;
use thiserror::Error;

/// Longest message, in characters, the chat platform accepts from a bot.
pub const MESSAGE_CHAR_LIMIT: usize = 2000;

/// Cut `text` into pieces of at most `limit` characters, splitting only on char boundaries.
/// Joining the pieces gives back `text` exactly. Empty input gives no pieces.
pub fn split_message(text: &str, limit: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(limit.max(1))
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (piece, tail) = rest.split_at(cut);
        pieces.push(piece);
        rest = tail;
    }
    pieces
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlatformError {
    #[error("Missing permission: {0}")]
    Permission(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Port for the chat platform's outbound operations.
///
/// The Discord layer implements this over serenity's HTTP client; tests use an in-memory fake.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), PlatformError>;

    /// Post `text` to a channel, returning the new message's id.
    async fn send_message(&self, channel_id: u64, text: &str) -> Result<u64, PlatformError>;

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<(), PlatformError>;

    /// Whether a channel with this id exists and is visible to the bot.
    async fn channel_exists(&self, channel_id: u64) -> Result<bool, PlatformError>;
}

pub struct NotificationDispatcher<P: ChatPlatform> {
    platform: P,
}

impl<P: ChatPlatform> NotificationDispatcher<P> {
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    pub async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), PlatformError> {
        let result = self.platform.delete_message(channel_id, message_id).await;
        if let Err(e) = &result {
            tracing::warn!(channel_id, message_id, "Failed to delete message: {}", e);
        }
        result
    }

    pub async fn send_message(&self, channel_id: u64, text: &str) -> Result<u64, PlatformError> {
        let result = self.platform.send_message(channel_id, text).await;
        if let Err(e) = &result {
            tracing::warn!(channel_id, "Failed to send message: {}", e);
        }
        result
    }

    pub async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<(), PlatformError> {
        let result = self.platform.add_reaction(channel_id, message_id, emoji).await;
        if let Err(e) = &result {
            tracing::warn!(channel_id, message_id, emoji, "Failed to add reaction: {}", e);
        }
        result
    }

    pub async fn channel_exists(&self, channel_id: u64) -> Result<bool, PlatformError> {
        self.platform.channel_exists(channel_id).await
    }
}
