// This module handles bot presence.
//
// Discord-layer glue only: we work with serenity types (Context, ActivityData,
// OnlineStatus) and keep the logic short.

use poise::serenity_prelude as serenity;

/// Show that the bot is watching chat, and how to get help.
pub fn on_ready(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching("for scams | !help");
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
