// Moderation admin commands.
//
// Thin layer: parse input, call the core service, format the reply.

use crate::core::moderation::{FailurePolicy, ModerationError};
use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;

pub const USAGE_REVIEW_CHANNEL: &str = "Usage: `!reviewchannel <channel_id>`";

/// Parse a channel id typed by an admin. Snowflakes are positive integers.
fn parse_channel_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    // Accept a pasted channel mention like <#123>
    let raw = raw
        .strip_prefix("<#")
        .and_then(|r| r.strip_suffix('>'))
        .unwrap_or(raw);
    raw.parse::<u64>().ok().filter(|id| *id != 0)
}

/// Set the moderation review channel (Admin only).
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn reviewchannel(
    ctx: Context<'_>,
    #[description = "ID of the channel that receives review prompts"] channel_id: String,
) -> Result<(), Error> {
    let Some(channel_id) = parse_channel_id(&channel_id) else {
        ctx.say("❌ Invalid channel ID. Please provide a numeric ID.")
            .await?;
        return Ok(());
    };

    match ctx.data().moderation.set_review_channel(channel_id).await {
        Ok(()) => {
            ctx.say(format!("✅ Review channel set to <#{}>", channel_id))
                .await?;
        }
        Err(ModerationError::ChannelNotFound(_)) => {
            ctx.say("❌ Could not find a channel with that ID.").await?;
        }
        Err(e) => {
            tracing::error!(channel_id, "Failed to verify review channel: {}", e);
            ctx.say("❌ Could not verify that channel right now. Please try again.")
                .await?;
        }
    }

    Ok(())
}

/// Show the review channel and pending reviews (Admin only).
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn reviewstatus(ctx: Context<'_>) -> Result<(), Error> {
    let moderation = &ctx.data().moderation;

    let channel = moderation
        .review_channel()
        .await
        .map(|id| format!("<#{}>", id))
        .unwrap_or_else(|| "⚠️ Not set - flagged messages are deleted without review".to_string());

    let pending = moderation.pending_reviews();
    let oldest = pending
        .first()
        .map(|r| format!("<t:{}:R>", r.quarantined_at.timestamp()))
        .unwrap_or_else(|| "None".to_string());

    let policy = match moderation.failure_policy() {
        FailurePolicy::FailOpen => "Allow message (fail-open)",
        FailurePolicy::FailClosed => "Quarantine message (fail-closed)",
    };

    let embed = serenity::CreateEmbed::new()
        .title("🛡️ Spam Review Status")
        .color(serenity::Color::BLURPLE)
        .field("Review Channel", channel, false)
        .field("Pending Reviews", pending.len().to_string(), true)
        .field("Oldest Pending", oldest, true)
        .field("When the classifier is down", policy, false)
        .footer(serenity::CreateEmbedFooter::new(
            "Pending reviews are kept in memory and lost on restart",
        ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Framework error hook: turns argument and permission failures into direct replies.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let reply = match (ctx.command().name.as_str(), input) {
                ("reviewchannel", None) => USAGE_REVIEW_CHANNEL,
                ("reviewchannel", Some(_)) => "❌ Invalid channel ID. Please provide a numeric ID.",
                _ => "❌ Invalid arguments. Type `!help` for usage.",
            };
            if let Err(e) = ctx.say(reply).await {
                tracing::warn!("Failed to send argument error reply: {}", e);
            }
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            let reply = if ctx.command().name == "reviewchannel" {
                "❌ Only administrators can set the review channel."
            } else {
                "❌ Only administrators can use this command."
            };
            if let Err(e) = ctx.say(reply).await {
                tracing::warn!("Failed to send permission error reply: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}
