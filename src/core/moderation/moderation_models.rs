// Moderation domain models - data structures for the quarantine-and-review workflow.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer converts serenity events into these and back.

use chrono::{DateTime, Utc};

/// Emoji a moderator reacts with to restore a quarantined message.
pub const APPROVE_EMOJI: &str = "✅";
/// Emoji a moderator reacts with to confirm a message as spam.
pub const REJECT_EMOJI: &str = "❌";

/// A message seen in a guild channel, reduced to what the pipeline needs.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub message_id: u64,
    pub channel_id: u64,
    pub author_id: u64,
    pub content: String,
    /// Bots and webhooks; never processed.
    pub is_automated_author: bool,
}

/// A reaction added to some message.
#[derive(Debug, Clone)]
pub struct ReactionEvent {
    pub emoji: String,
    pub target_message_id: u64,
    pub channel_id: u64,
    pub actor_id: u64,
    pub is_automated_actor: bool,
}

/// Label produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamLabel {
    Spam,
    Ham,
}

impl std::fmt::Display for SpamLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpamLabel::Spam => write!(f, "spam"),
            SpamLabel::Ham => write!(f, "ham"),
        }
    }
}

/// Classifier output. `confidence` is only ever displayed, never used as a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: SpamLabel,
    pub confidence: f32,
}

impl Classification {
    pub fn spam(confidence: f32) -> Self {
        Self {
            label: SpamLabel::Spam,
            confidence,
        }
    }

    pub fn ham(confidence: f32) -> Self {
        Self {
            label: SpamLabel::Ham,
            confidence,
        }
    }

    pub fn is_spam(&self) -> bool {
        self.label == SpamLabel::Spam
    }

    /// Confidence as a percentage with two decimals, e.g. `94.00%`.
    pub fn formatted_confidence(&self) -> String {
        format!("{:.2}%", f64::from(self.confidence) * 100.0)
    }
}

/// One quarantined message awaiting a human verdict.
///
/// Keyed in the registry by the id of the review prompt posted into the moderation channel.
/// A record only exists while the review is pending; resolving it evicts it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub review_id: u64,
    pub author_id: u64,
    /// Captured at quarantine time and never modified.
    pub content: String,
    pub origin_channel_id: u64,
    pub confidence: f32,
    pub quarantined_at: DateTime<Utc>,
}

/// The two decisions a moderator can make on a review prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Map a reaction emoji to a decision. Anything else is not a decision.
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        match emoji {
            APPROVE_EMOJI => Some(Decision::Approve),
            REJECT_EMOJI => Some(Decision::Reject),
            _ => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Decision::Approve => APPROVE_EMOJI,
            Decision::Reject => REJECT_EMOJI,
        }
    }
}

/// What the quarantine controller did with one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum QuarantineOutcome {
    /// Author is a bot; nothing happened.
    IgnoredAutomated,
    /// Every link points at an allow-listed domain; the classifier was not called.
    Whitelisted,
    /// Classified as ham; nothing happened.
    Clean,
    /// Classified as spam; see the report for which side effects succeeded.
    Quarantined(QuarantineReport),
}

/// Per-step results of quarantining a message. Every step is best-effort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuarantineReport {
    pub original_deleted: bool,
    pub author_warned: bool,
    /// Id of the review prompt, when one was published.
    pub review_id: Option<u64>,
    /// How many of the two decision reactions were attached.
    pub affordances_attached: u8,
    /// Whether a registry entry now tracks this review.
    pub registered: bool,
}

/// What the decision state machine did with one reaction.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    /// Wrong actor, channel or emoji; no side effect.
    Ignored,
    /// Reaction target is not (or no longer) a pending review.
    UnknownReview,
    /// The review was resolved by this reaction.
    Resolved {
        decision: Decision,
        record: ReviewRecord,
        restored: bool,
        announced: bool,
    },
}
