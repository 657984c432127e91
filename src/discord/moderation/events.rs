// Translate serenity events into the core's inbound event types.
//
// Pure conversion, no I/O: the event handler forwards the result to the event pipeline.

use crate::core::moderation::{InboundMessage, ReactionEvent};
use poise::serenity_prelude as serenity;

/// Guild messages only; DMs have nothing to quarantine them from.
pub fn inbound_message(message: &serenity::Message) -> Option<InboundMessage> {
    message.guild_id?;

    Some(InboundMessage {
        message_id: message.id.get(),
        channel_id: message.channel_id.get(),
        author_id: message.author.id.get(),
        content: message.content.clone(),
        is_automated_author: message.author.bot || message.webhook_id.is_some(),
    })
}

/// Unicode-emoji reactions with a known actor. Custom emoji can never be a decision.
pub fn reaction_event(
    reaction: &serenity::Reaction,
    bot_id: serenity::UserId,
) -> Option<ReactionEvent> {
    let emoji = match &reaction.emoji {
        serenity::ReactionType::Unicode(emoji) => emoji.clone(),
        _ => return None,
    };
    let actor = reaction.user_id?;

    let is_automated_actor = actor == bot_id
        || reaction
            .member
            .as_ref()
            .map(|member| member.user.bot)
            .unwrap_or(false);

    Some(ReactionEvent {
        emoji,
        target_message_id: reaction.message_id.get(),
        channel_id: reaction.channel_id.get(),
        actor_id: actor.get(),
        is_automated_actor,
    })
}
