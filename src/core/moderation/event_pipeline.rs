// Event pipeline - two independent consumers feeding the moderation service.
//
// Message events go to the quarantine controller, reaction events to the decision flow.
// Each consumer owns its own channel and spawns one task per event, so a slow classifier
// call or a panicking handler never holds up the other events.
//
// There is no backpressure: a burst of messages becomes a burst of classifier calls.

use super::classification::SpamClassifier;
use super::dispatcher::ChatPlatform;
use super::moderation_models::{InboundMessage, ReactionEvent};
use super::moderation_service::ModerationService;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Cheap, cloneable handle the Discord event handler uses to enqueue work.
#[derive(Clone)]
pub struct EventSender {
    messages: UnboundedSender<InboundMessage>,
    reactions: UnboundedSender<ReactionEvent>,
}

impl EventSender {
    pub fn message(&self, message: InboundMessage) {
        if let Err(e) = self.messages.send(message) {
            tracing::warn!(message_id = e.0.message_id, "Message consumer stopped, dropping event");
        }
    }

    pub fn reaction(&self, reaction: ReactionEvent) {
        if let Err(e) = self.reactions.send(reaction) {
            tracing::warn!(
                target_message_id = e.0.target_message_id,
                "Reaction consumer stopped, dropping event"
            );
        }
    }
}

/// Handles of the two running consumers. They stop once every `EventSender` is dropped.
pub struct EventPipeline {
    pub messages: JoinHandle<()>,
    pub reactions: JoinHandle<()>,
}

impl EventPipeline {
    /// Start both consumers on the current tokio runtime.
    pub fn spawn<C, P>(service: Arc<ModerationService<C, P>>) -> (EventSender, EventPipeline)
    where
        C: SpamClassifier + 'static,
        P: ChatPlatform + 'static,
    {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let (reaction_tx, reaction_rx) = mpsc::unbounded_channel();

        let pipeline = EventPipeline {
            messages: tokio::spawn(consume_messages(Arc::clone(&service), message_rx)),
            reactions: tokio::spawn(consume_reactions(service, reaction_rx)),
        };

        let sender = EventSender {
            messages: message_tx,
            reactions: reaction_tx,
        };

        (sender, pipeline)
    }
}

async fn consume_messages<C, P>(
    service: Arc<ModerationService<C, P>>,
    mut rx: UnboundedReceiver<InboundMessage>,
) where
    C: SpamClassifier + 'static,
    P: ChatPlatform + 'static,
{
    while let Some(message) = rx.recv().await {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            let outcome = service.handle_message(&message).await;
            tracing::debug!(message_id = message.message_id, ?outcome, "Message processed");
        });
    }
    tracing::info!("Message consumer stopped");
}

async fn consume_reactions<C, P>(
    service: Arc<ModerationService<C, P>>,
    mut rx: UnboundedReceiver<ReactionEvent>,
) where
    C: SpamClassifier + 'static,
    P: ChatPlatform + 'static,
{
    while let Some(reaction) = rx.recv().await {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            let outcome = service.handle_reaction(&reaction).await;
            tracing::debug!(
                target_message_id = reaction.target_message_id,
                ?outcome,
                "Reaction processed"
            );
        });
    }
    tracing::info!("Reaction consumer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::test_support::{
        MockPlatform, ScriptedClassifier, AUTHOR, MODERATOR, ORIGIN, REVIEW,
    };
    use crate::core::moderation::{
        Classification, ClassificationGateway, ClassifierError, DomainWhitelist, FailurePolicy,
        NotificationDispatcher, APPROVE_EMOJI,
    };
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Flags everything as spam, but panics on one poisoned text.
    struct PanickyClassifier;

    #[async_trait]
    impl SpamClassifier for PanickyClassifier {
        async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
            if text.contains("poison") {
                panic!("classifier blew up");
            }
            Ok(Classification::spam(0.9))
        }
    }

    fn service(
        platform: &MockPlatform,
    ) -> Arc<ModerationService<ScriptedClassifier, MockPlatform>> {
        let classifier = ScriptedClassifier {
            verdict: Ok(Classification::spam(0.8)),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        Arc::new(ModerationService::new(
            DomainWhitelist::default(),
            ClassificationGateway::new(classifier, Duration::from_secs(1), FailurePolicy::FailOpen),
            NotificationDispatcher::new(platform.clone()),
        ))
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not met in time");
    }

    #[tokio::test]
    async fn test_consumers_drive_quarantine_and_review() {
        let platform = MockPlatform::new();
        let service = service(&platform);
        service.set_review_channel(REVIEW).await.unwrap();
        let (sender, pipeline) = EventPipeline::spawn(Arc::clone(&service));

        sender.message(InboundMessage {
            message_id: 1,
            channel_id: ORIGIN,
            author_id: AUTHOR,
            content: "claim your prize http://evil-scam.net".to_string(),
            is_automated_author: false,
        });

        wait_until(|| service.pending_count() == 1).await;
        let review_id = service.pending_reviews()[0].review_id;

        sender.reaction(ReactionEvent {
            emoji: APPROVE_EMOJI.to_string(),
            target_message_id: review_id,
            channel_id: REVIEW,
            actor_id: MODERATOR,
            is_automated_actor: false,
        });

        wait_until(|| service.pending_count() == 0).await;
        wait_until(|| {
            platform
                .sends_to(REVIEW)
                .iter()
                .any(|m| m == "✅ Message approved by <@8>")
        })
        .await;

        drop(sender);
        pipeline.messages.await.unwrap();
        pipeline.reactions.await.unwrap();
    }

    #[tokio::test]
    async fn test_panicking_handler_does_not_stop_consumer() {
        let platform = MockPlatform::new();
        let service = Arc::new(ModerationService::new(
            DomainWhitelist::default(),
            ClassificationGateway::new(
                PanickyClassifier,
                Duration::from_secs(1),
                FailurePolicy::FailOpen,
            ),
            NotificationDispatcher::new(platform.clone()),
        ));
        service.set_review_channel(REVIEW).await.unwrap();
        let (sender, pipeline) = EventPipeline::spawn(Arc::clone(&service));

        sender.message(InboundMessage {
            message_id: 1,
            channel_id: ORIGIN,
            author_id: AUTHOR,
            content: "poison pill".to_string(),
            is_automated_author: false,
        });
        sender.message(InboundMessage {
            message_id: 2,
            channel_id: ORIGIN,
            author_id: AUTHOR,
            content: "free nitro http://evil-scam.net/claim".to_string(),
            is_automated_author: false,
        });

        wait_until(|| service.pending_count() == 1).await;
        assert_eq!(
            service.pending_reviews()[0].content,
            "free nitro http://evil-scam.net/claim"
        );
        assert!(!pipeline.messages.is_finished());

        drop(sender);
        pipeline.messages.await.unwrap();
        pipeline.reactions.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_after_shutdown_does_not_panic() {
        let platform = MockPlatform::new();
        let (sender, pipeline) = EventPipeline::spawn(service(&platform));
        pipeline.messages.abort();
        pipeline.reactions.abort();
        let _ = pipeline.messages.await;
        let _ = pipeline.reactions.await;

        sender.message(InboundMessage {
            message_id: 2,
            channel_id: ORIGIN,
            author_id: AUTHOR,
            content: "hello".to_string(),
            is_automated_author: false,
        });
        sender.reaction(ReactionEvent {
            emoji: APPROVE_EMOJI.to_string(),
            target_message_id: 1,
            channel_id: REVIEW,
            actor_id: MODERATOR,
            is_automated_actor: false,
        });
    }
}
