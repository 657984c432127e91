// Serenity implementation of the core `ChatPlatform` port.
//
// Translates primitive ids into serenity types and serenity errors into `PlatformError`
// so the core never sees an HTTP status code.

use crate::core::moderation::{ChatPlatform, PlatformError};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use ::serenity::http::HttpError;
use std::sync::Arc;

pub struct SerenityPlatform {
    http: Arc<serenity::Http>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

/// 403 and 404 get their own variants; everything else is a transport problem.
fn map_error(err: ::serenity::Error) -> PlatformError {
    if let ::serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &err {
        match response.status_code.as_u16() {
            403 => return PlatformError::Permission(response.error.message.clone()),
            404 => return PlatformError::NotFound(response.error.message.clone()),
            _ => {}
        }
    }
    PlatformError::Transport(err.to_string())
}

#[async_trait]
impl ChatPlatform for SerenityPlatform {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), PlatformError> {
        serenity::ChannelId::new(channel_id)
            .delete_message(&self.http, serenity::MessageId::new(message_id))
            .await
            .map_err(map_error)
    }

    async fn send_message(&self, channel_id: u64, text: &str) -> Result<u64, PlatformError> {
        let message = serenity::ChannelId::new(channel_id)
            .say(&self.http, text)
            .await
            .map_err(map_error)?;
        Ok(message.id.get())
    }

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<(), PlatformError> {
        serenity::ChannelId::new(channel_id)
            .create_reaction(
                &self.http,
                serenity::MessageId::new(message_id),
                serenity::ReactionType::Unicode(emoji.to_string()),
            )
            .await
            .map_err(map_error)
    }

    async fn channel_exists(&self, channel_id: u64) -> Result<bool, PlatformError> {
        // Snowflakes are never zero, and serenity ids panic on it.
        if channel_id == 0 {
            return Ok(false);
        }

        match self
            .http
            .get_channel(serenity::ChannelId::new(channel_id))
            .await
            .map_err(map_error)
        {
            Ok(_) => Ok(true),
            // The bot can't see it, so it can't post reviews there either.
            Err(PlatformError::NotFound(_)) | Err(PlatformError::Permission(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
