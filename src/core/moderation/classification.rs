// Classification gateway - the only place the pipeline talks to the spam model.
//
// The model itself is a black box behind `SpamClassifier`. The gateway adds a timeout and
// turns classifier failures into a verdict according to `FailurePolicy`, so a broken model
// never takes the event loop down with it.

use super::moderation_models::Classification;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier request failed: {0}")]
    Request(String),

    #[error("Classifier returned an unusable response: {0}")]
    InvalidResponse(String),

    #[error("Classifier did not answer within {0:?}")]
    Timeout(Duration),
}

/// Port for the text classifier.
#[async_trait]
pub trait SpamClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError>;
}

#[async_trait]
impl SpamClassifier for Box<dyn SpamClassifier> {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        (**self).classify(text).await
    }
}

/// What to assume when the classifier cannot give an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Treat the message as ham. Keeps chat flowing while the model is down.
    #[default]
    FailOpen,
    /// Treat the message as spam so a human looks at it.
    FailClosed,
}

pub struct ClassificationGateway<C: SpamClassifier> {
    classifier: C,
    timeout: Duration,
    policy: FailurePolicy,
}

impl<C: SpamClassifier> ClassificationGateway<C> {
    pub fn new(classifier: C, timeout: Duration, policy: FailurePolicy) -> Self {
        Self {
            classifier,
            timeout,
            policy,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Classify `text`, applying the failure policy instead of returning an error.
    pub async fn classify(&self, text: &str) -> Classification {
        let result = match tokio::time::timeout(self.timeout, self.classifier.classify(text)).await
        {
            Ok(result) => result,
            Err(_) => Err(ClassifierError::Timeout(self.timeout)),
        };

        match result {
            Ok(classification) => classification,
            Err(err) => {
                tracing::warn!(policy = ?self.policy, "Spam classification failed: {}", err);
                match self.policy {
                    FailurePolicy::FailOpen => Classification::ham(0.0),
                    FailurePolicy::FailClosed => Classification::spam(0.0),
                }
            }
        }
    }
}
