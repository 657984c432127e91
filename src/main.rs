// This is the entry point of the moderation bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (the HTTP classifier)
// - `discord/` = Discord-specific adapters (commands, events, outbound calls)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Forward message and reaction events to the moderation pipeline

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::moderation::{
    ClassificationGateway, DomainWhitelist, EventPipeline, ModerationConfig, ModerationService,
    NotificationDispatcher,
};
use crate::discord::commands::presence;
use crate::discord::moderation::events as moderation_events;
use crate::discord::moderation::SerenityPlatform;
use crate::discord::{Data, Error};
use crate::infra::classifier::HttpSpamClassifier;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
/// Messages and reactions are handed to the moderation pipeline and processed in the
/// background, so this returns immediately.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            if let Some(message) = moderation_events::inbound_message(new_message) {
                data.events.message(message);
            }
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            let bot_id = ctx.cache.current_user().id;
            if let Some(reaction) = moderation_events::reaction_event(add_reaction, bot_id) {
                data.events.reaction(reaction);
            }
        }
        // Removing a reaction never reopens a review.
        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Get Discord bot token from environment
    let token = std::env::var("DISCORD_TOKEN").expect(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    );

    let config = ModerationConfig::from_env().expect("Invalid moderation configuration");
    tracing::info!(
        classifier_url = %config.classifier_url,
        timeout_secs = config.classifier_timeout.as_secs(),
        policy = ?config.failure_policy,
        allowed_domains = ?config.allowed_domains,
        "Moderation configuration loaded"
    );

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                discord::commands::help::help(),
                discord::moderation::commands::reviewchannel(),
                discord::moderation::commands::reviewstatus(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".into()),
                ..Default::default()
            },
            on_error: |error| Box::pin(discord::moderation::commands::on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Logged in as {}", ready.user.name);

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                // ============================================================
                // DEPENDENCY INJECTION
                // ============================================================
                // The platform needs the HTTP client, which only exists once we're connected,
                // so the moderation service is wired together here.

                let classifier =
                    HttpSpamClassifier::new(config.classifier_url, config.classifier_api_key);
                let gateway = ClassificationGateway::new(
                    classifier,
                    config.classifier_timeout,
                    config.failure_policy,
                );
                let dispatcher = NotificationDispatcher::new(SerenityPlatform::new(ctx.http.clone()));
                let moderation = Arc::new(ModerationService::new(
                    DomainWhitelist::new(config.allowed_domains),
                    gateway,
                    dispatcher,
                ));

                // Message and reaction consumers run for the lifetime of the process.
                let (events, _pipeline) = EventPipeline::spawn(Arc::clone(&moderation));

                presence::on_ready(ctx);
                tracing::info!("🚀 Bot is ready! Use !reviewchannel <channel_id> to enable reviews.");

                Ok(Data { moderation, events })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
