// In-memory fakes shared by the moderation tests.

use super::classification::{ClassifierError, SpamClassifier};
use super::dispatcher::{ChatPlatform, PlatformError, MESSAGE_CHAR_LIMIT};
use super::moderation_models::Classification;
use async_trait::async_trait;
use dashmap::DashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ORIGIN: u64 = 100;
pub const REVIEW: u64 = 200;
pub const AUTHOR: u64 = 7;
pub const MODERATOR: u64 = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Delete { channel_id: u64, message_id: u64 },
    Send { channel_id: u64, text: String, id: u64 },
    React { message_id: u64, emoji: String },
}

#[derive(Default)]
pub struct PlatformState {
    pub calls: Mutex<Vec<Call>>,
    pub next_id: AtomicU64,
    pub channels: DashSet<u64>,
    pub fail_delete: AtomicBool,
    pub fail_send_to: DashSet<u64>,
    pub fail_react: AtomicBool,
}

/// Records every outbound call; failures are switched on per operation.
/// Sends longer than the platform's message limit are rejected like the real client does.
#[derive(Clone, Default)]
pub struct MockPlatform {
    pub state: Arc<PlatformState>,
}

impl MockPlatform {
    pub fn new() -> Self {
        let platform = Self::default();
        platform.state.next_id.store(1000, Ordering::SeqCst);
        platform.state.channels.insert(ORIGIN);
        platform.state.channels.insert(REVIEW);
        platform
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn sends_to(&self, channel: u64) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send {
                    channel_id, text, ..
                } if channel_id == channel => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatPlatform for MockPlatform {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), PlatformError> {
        if self.state.fail_delete.load(Ordering::SeqCst) {
            return Err(PlatformError::NotFound("Unknown Message".to_string()));
        }
        self.state.calls.lock().unwrap().push(Call::Delete {
            channel_id,
            message_id,
        });
        Ok(())
    }

    async fn send_message(&self, channel_id: u64, text: &str) -> Result<u64, PlatformError> {
        if self.state.fail_send_to.contains(&channel_id) {
            return Err(PlatformError::Permission("Send Messages".to_string()));
        }
        if text.chars().count() > MESSAGE_CHAR_LIMIT {
            return Err(PlatformError::Transport("Message too large".to_string()));
        }
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        self.state.calls.lock().unwrap().push(Call::Send {
            channel_id,
            text: text.to_string(),
            id,
        });
        Ok(id)
    }

    async fn add_reaction(
        &self,
        _channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<(), PlatformError> {
        if self.state.fail_react.load(Ordering::SeqCst) {
            return Err(PlatformError::Transport("reset by peer".to_string()));
        }
        self.state.calls.lock().unwrap().push(Call::React {
            message_id,
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn channel_exists(&self, channel_id: u64) -> Result<bool, PlatformError> {
        Ok(self.state.channels.contains(&channel_id))
    }
}

/// Returns the same verdict every time (`Err(())` simulates an outage) and counts calls.
pub struct ScriptedClassifier {
    pub verdict: Result<Classification, ()>,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SpamClassifier for ScriptedClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict
            .map_err(|_| ClassifierError::Request("model offline".to_string()))
    }
}
