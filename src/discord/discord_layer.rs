// Discord layer - commands, event translation and the serenity-backed platform.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "moderation/mod.rs"]
pub mod moderation;

use crate::core::moderation::{EventSender, ModerationService};
use crate::infra::classifier::HttpSpamClassifier;
use std::sync::Arc;

pub type Moderation = ModerationService<HttpSpamClassifier, moderation::SerenityPlatform>;

/// Shared state handed to every command and event.
pub struct Data {
    pub moderation: Arc<Moderation>,
    pub events: EventSender,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
