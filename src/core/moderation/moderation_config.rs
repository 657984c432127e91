// Startup configuration for the moderation pipeline.
//
// Read once from the environment (after `.env` is loaded). The review channel is NOT part of
// this: it is runtime state set by an administrator and lives in `ModerationService`.

use super::classification::FailurePolicy;
use super::whitelist::DEFAULT_ALLOWED_DOMAINS;
use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_CLASSIFIER_URL: &str = "http://127.0.0.1:8000/classify";
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ModerationConfig {
    /// Endpoint of the spam classification service
    pub classifier_url: String,
    /// Optional bearer token for the classifier
    pub classifier_api_key: Option<String>,
    /// Upper bound on one classification call
    pub classifier_timeout: Duration,
    /// What to do when the classifier errors or times out
    pub failure_policy: FailurePolicy,
    /// Domain substrings that exempt a link from classification
    pub allowed_domains: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            classifier_url: DEFAULT_CLASSIFIER_URL.to_string(),
            classifier_api_key: None,
            classifier_timeout: Duration::from_secs(DEFAULT_CLASSIFIER_TIMEOUT_SECS),
            failure_policy: FailurePolicy::FailOpen,
            allowed_domains: DEFAULT_ALLOWED_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

impl ModerationConfig {
    /// Build the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset keys keep their defaults;
    /// set-but-malformed keys are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("CLASSIFIER_URL").filter(|v| !v.trim().is_empty()) {
            config.classifier_url = url.trim().to_string();
        }

        config.classifier_api_key = lookup("CLASSIFIER_API_KEY").filter(|v| !v.trim().is_empty());

        if let Some(raw) = lookup("CLASSIFIER_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("CLASSIFIER_TIMEOUT_SECS must be a number, got {raw:?}"))?;
            if secs == 0 {
                anyhow::bail!("CLASSIFIER_TIMEOUT_SECS must be greater than zero");
            }
            config.classifier_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("CLASSIFIER_FAIL_CLOSED") {
            let fail_closed = raw
                .trim()
                .parse::<bool>()
                .with_context(|| format!("CLASSIFIER_FAIL_CLOSED must be true or false, got {raw:?}"))?;
            config.failure_policy = if fail_closed {
                FailurePolicy::FailClosed
            } else {
                FailurePolicy::FailOpen
            };
        }

        if let Some(raw) = lookup("ALLOWED_DOMAINS") {
            config.allowed_domains = raw
                .split(',')
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect();
        }

        Ok(config)
    }
}
