// Moderation service - quarantine controller and review decision flow.
//
// This service handles:
// - Filtering inbound messages (bots, whitelisted links)
// - Quarantining messages the classifier flags as spam
// - Publishing review prompts and tracking them until a moderator decides
// - Resolving each review exactly once from moderator reactions
//
// NO Discord dependencies here - outbound calls go through the `ChatPlatform` port.

use super::classification::{ClassificationGateway, FailurePolicy, SpamClassifier};
use super::dispatcher::{
    split_message, ChatPlatform, NotificationDispatcher, PlatformError, MESSAGE_CHAR_LIMIT,
};
use super::moderation_models::{
    Classification, Decision, DecisionOutcome, InboundMessage, QuarantineOutcome,
    QuarantineReport, ReactionEvent, ReviewRecord,
};
use super::review_registry::ReviewRegistry;
use super::whitelist::DomainWhitelist;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Could not find a channel with ID {0}")]
    ChannelNotFound(u64),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

// ============================================================================
// OUTBOUND TEXT
// ============================================================================

fn warning_text(author_id: u64) -> String {
    format!(
        "<@{}>, your message is pending review for potential spam. \
         Please refrain from sending malicious links or messages.",
        author_id
    )
}

const TRUNCATED_MARKER: &str = "\n[... truncated]";

fn render_review_prompt(message: &InboundMessage, verdict: &Classification, shown: &str) -> String {
    format!(
        "⚠️ **Potential Scam Detected**\n\
         **User:** <@{}>\n\
         **Channel:** <#{}>\n\
         **Confidence:** {}\n\n\
         **Content:**\n```{}```\n\
         React with {} to approve and restore message.\n\
         React with {} to confirm deletion.",
        message.author_id,
        message.channel_id,
        verdict.formatted_confidence(),
        shown,
        Decision::Approve.emoji(),
        Decision::Reject.emoji(),
    )
}

/// The review prompt, with the quoted content cut short if the whole prompt would not fit
/// in one message. Only the displayed copy is shortened; the review record keeps it all.
fn review_prompt(message: &InboundMessage, verdict: &Classification) -> String {
    let full = render_review_prompt(message, verdict, &message.content);
    if full.chars().count() <= MESSAGE_CHAR_LIMIT {
        return full;
    }

    let overhead = render_review_prompt(message, verdict, TRUNCATED_MARKER)
        .chars()
        .count();
    let budget = MESSAGE_CHAR_LIMIT.saturating_sub(overhead);
    let shown: String = message.content.chars().take(budget).collect();
    render_review_prompt(message, verdict, &format!("{}{}", shown, TRUNCATED_MARKER))
}

fn restore_header(author_id: u64) -> String {
    format!("📥 **Approved message from <@{}>:**", author_id)
}

fn decision_announcement(decision: Decision, moderator_id: u64) -> String {
    match decision {
        Decision::Approve => format!("✅ Message approved by <@{}>", moderator_id),
        Decision::Reject => format!("❌ Message confirmed as spam by <@{}>", moderator_id),
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Owns every piece of mutable moderation state: the review channel setting and the
/// registry of pending reviews. Built once at startup and shared behind an `Arc`.
pub struct ModerationService<C: SpamClassifier, P: ChatPlatform> {
    whitelist: DomainWhitelist,
    gateway: ClassificationGateway<C>,
    dispatcher: NotificationDispatcher<P>,
    registry: ReviewRegistry,
    /// Unset at startup, changed only by the admin command, never persisted.
    review_channel: RwLock<Option<u64>>,
}

impl<C: SpamClassifier, P: ChatPlatform> ModerationService<C, P> {
    pub fn new(
        whitelist: DomainWhitelist,
        gateway: ClassificationGateway<C>,
        dispatcher: NotificationDispatcher<P>,
    ) -> Self {
        Self {
            whitelist,
            gateway,
            dispatcher,
            registry: ReviewRegistry::new(),
            review_channel: RwLock::new(None),
        }
    }

    pub async fn review_channel(&self) -> Option<u64> {
        *self.review_channel.read().await
    }

    /// Point reviews at `channel_id` after checking the channel exists.
    pub async fn set_review_channel(&self, channel_id: u64) -> Result<(), ModerationError> {
        if !self.dispatcher.channel_exists(channel_id).await? {
            return Err(ModerationError::ChannelNotFound(channel_id));
        }

        let previous = self.review_channel.write().await.replace(channel_id);
        tracing::info!(channel_id, ?previous, "Review channel configured");
        Ok(())
    }

    pub fn pending_reviews(&self) -> Vec<ReviewRecord> {
        self.registry.pending()
    }

    pub fn pending_count(&self) -> usize {
        self.registry.len()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.gateway.policy()
    }

    /// Run one inbound message through whitelist, classifier and quarantine.
    ///
    /// Side effects happen in this order, each one best-effort:
    /// delete original, warn author, post review prompt, attach the two decision
    /// reactions, register the review.
    pub async fn handle_message(&self, message: &InboundMessage) -> QuarantineOutcome {
        if message.is_automated_author {
            return QuarantineOutcome::IgnoredAutomated;
        }

        if self.whitelist.is_whitelisted(&message.content) {
            tracing::debug!(message_id = message.message_id, "All links whitelisted");
            return QuarantineOutcome::Whitelisted;
        }

        let verdict = self.gateway.classify(&message.content).await;
        tracing::debug!(
            message_id = message.message_id,
            label = %verdict.label,
            confidence = verdict.confidence,
            "Message classified"
        );
        if !verdict.is_spam() {
            return QuarantineOutcome::Clean;
        }

        tracing::info!(
            message_id = message.message_id,
            channel_id = message.channel_id,
            author_id = message.author_id,
            confidence = verdict.confidence,
            "Quarantining suspected spam"
        );

        let mut report = QuarantineReport {
            original_deleted: self
                .dispatcher
                .delete_message(message.channel_id, message.message_id)
                .await
                .is_ok(),
            ..Default::default()
        };

        report.author_warned = self
            .dispatcher
            .send_message(message.channel_id, &warning_text(message.author_id))
            .await
            .is_ok();

        // Without a review channel the message stays deleted with no way to restore it.
        let Some(review_channel) = self.review_channel().await else {
            tracing::warn!(
                message_id = message.message_id,
                "No review channel set. Use !reviewchannel <channel_id> to set one."
            );
            return QuarantineOutcome::Quarantined(report);
        };

        let review_id = match self
            .dispatcher
            .send_message(review_channel, &review_prompt(message, &verdict))
            .await
        {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(
                    message_id = message.message_id,
                    review_channel,
                    "Could not publish review prompt, message cannot be restored: {}",
                    e
                );
                return QuarantineOutcome::Quarantined(report);
            }
        };
        report.review_id = Some(review_id);

        for decision in [Decision::Approve, Decision::Reject] {
            if self
                .dispatcher
                .add_reaction(review_channel, review_id, decision.emoji())
                .await
                .is_ok()
            {
                report.affordances_attached += 1;
            }
        }

        let record = ReviewRecord {
            review_id,
            author_id: message.author_id,
            content: message.content.clone(),
            origin_channel_id: message.channel_id,
            confidence: verdict.confidence,
            quarantined_at: Utc::now(),
        };

        match self.registry.put(review_id, record) {
            Ok(()) => report.registered = true,
            Err(e) => tracing::error!(review_id, "Failed to register review: {}", e),
        }

        QuarantineOutcome::Quarantined(report)
    }

    /// Apply a moderator's reaction to a review prompt.
    ///
    /// Only non-bot reactions with a decision emoji in the review channel count. The review is
    /// taken out of the registry before anything is sent, so duplicate or racing reactions
    /// find nothing and do nothing.
    pub async fn handle_reaction(&self, reaction: &ReactionEvent) -> DecisionOutcome {
        if reaction.is_automated_actor {
            return DecisionOutcome::Ignored;
        }

        let Some(decision) = Decision::from_emoji(&reaction.emoji) else {
            return DecisionOutcome::Ignored;
        };

        if self.review_channel().await != Some(reaction.channel_id) {
            return DecisionOutcome::Ignored;
        }

        let Some(record) = self.registry.take_if_present(reaction.target_message_id) else {
            return DecisionOutcome::UnknownReview;
        };

        tracing::info!(
            review_id = record.review_id,
            moderator_id = reaction.actor_id,
            ?decision,
            "Review resolved"
        );

        let restored = match decision {
            Decision::Approve => self.restore(&record).await,
            Decision::Reject => false,
        };

        let announced = self
            .dispatcher
            .send_message(
                reaction.channel_id,
                &decision_announcement(decision, reaction.actor_id),
            )
            .await
            .is_ok();

        DecisionOutcome::Resolved {
            decision,
            record,
            restored,
            announced,
        }
    }

    /// Repost approved content to its origin channel, byte for byte.
    ///
    /// Short content goes out as one message under the attribution line. Content that would
    /// push that over the message limit is sent after the attribution line in as many
    /// messages as it takes. Stops at the first failed send.
    async fn restore(&self, record: &ReviewRecord) -> bool {
        let header = restore_header(record.author_id);
        let combined = format!("{}\n{}", header, record.content);
        if combined.chars().count() <= MESSAGE_CHAR_LIMIT {
            return self
                .dispatcher
                .send_message(record.origin_channel_id, &combined)
                .await
                .is_ok();
        }

        if self
            .dispatcher
            .send_message(record.origin_channel_id, &header)
            .await
            .is_err()
        {
            return false;
        }

        for piece in split_message(&record.content, MESSAGE_CHAR_LIMIT) {
            if let Err(e) = self
                .dispatcher
                .send_message(record.origin_channel_id, piece)
                .await
            {
                tracing::error!(
                    review_id = record.review_id,
                    "Approved message was only partly restored: {}",
                    e
                );
                return false;
            }
        }
        true
    }
}

// ============================================================================
// TESTS
// ============================================================================
