// =============================================================================
// HTTP SPAM CLASSIFIER
// =============================================================================
//
// Implements `SpamClassifier` against a text-classification service reachable over HTTP.
// The fine-tuned scam model is served separately (e.g. a Hugging Face inference endpoint
// or a small local server); this client only posts text and reads back a label.
//
// **Request:** `POST {CLASSIFIER_URL}` with `{"inputs": "<text>"}`.
//
// **Accepted responses:**
// - `{"label": "spam", "confidence": 0.94}` (or `"score"` instead of `"confidence"`)
// - Hugging Face pipeline output: `[{"label": "LABEL_1", "score": 0.94}, ...]`
//   or the batched form `[[{...}, ...]]`. The highest score wins.
//
// Labels `spam`, `scam`, `phishing`, `label_1` and `1` mean spam; anything else is ham.

use crate::core::moderation::{Classification, ClassifierError, SpamClassifier};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const SPAM_LABELS: &[&str] = &["spam", "scam", "phishing", "label_1", "1"];

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    #[serde(alias = "confidence")]
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifierResponse {
    Single(LabelScore),
    Flat(Vec<LabelScore>),
    Batched(Vec<Vec<LabelScore>>),
}

pub struct HttpSpamClassifier {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpSpamClassifier {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            api_key,
        }
    }

    fn is_spam_label(label: &str) -> bool {
        let label = label.trim().to_lowercase();
        SPAM_LABELS.contains(&label.as_str())
    }

    /// Turn a response body into a classification.
    fn parse_response(body: &str) -> Result<Classification, ClassifierError> {
        let response: ClassifierResponse = serde_json::from_str(body)
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;

        let candidates = match response {
            ClassifierResponse::Single(single) => vec![single],
            ClassifierResponse::Flat(flat) => flat,
            ClassifierResponse::Batched(batched) => {
                batched.into_iter().next().unwrap_or_default()
            }
        };

        let best = candidates
            .into_iter()
            .filter(|c| c.score.is_finite())
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| ClassifierError::InvalidResponse("no labels returned".to_string()))?;

        let confidence = best.score.clamp(0.0, 1.0);
        if Self::is_spam_label(&best.label) {
            Ok(Classification::spam(confidence))
        } else {
            Ok(Classification::ham(confidence))
        }
    }
}

#[async_trait]
impl SpamClassifier for HttpSpamClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        let payload = json!({ "inputs": text });

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&payload);

        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ClassifierError::Request(format!(
                "Classifier API error: {} - {}",
                status, body
            )));
        }

        Self::parse_response(&body)
    }
}
