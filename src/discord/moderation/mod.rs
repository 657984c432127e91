// Discord side of moderation: serenity-backed platform, event translation, admin commands.

pub mod commands;
pub mod events;
pub mod serenity_platform;

pub use serenity_platform::SerenityPlatform;
