//! AI coach gateway: initial plan generation and chat replies.
//!
//! The gateway is a trait so the lifecycle manager and chat session can
//! be driven by a mock in tests; [`gemini::GeminiCoach`] is the real
//! implementation. Both calls may fail; callers substitute fixed
//! fallback content and never surface gateway errors to the user.

pub mod gemini;
pub mod session;

pub use gemini::GeminiCoach;
pub use session::ChatSession;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoachError;
use crate::profile::UserProfile;

/// How many prior messages accompany a chat request as context.
pub const HISTORY_WINDOW: usize = 5;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Coach,
}

/// One entry in a chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: format!("msg-{}", uuid::Uuid::new_v4()),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// External generative-AI service behind the coach features.
#[async_trait]
pub trait CoachGateway: Send + Sync {
    /// Ask for an initial daily plan: a short list of micro-task titles.
    async fn generate_plan(&self, profile: &UserProfile) -> Result<Vec<String>, CoachError>;

    /// Ask for a chat reply. `history` is the trailing context window the
    /// caller chose to supply; the new message is passed separately.
    async fn chat_reply(
        &self,
        history: &[ChatMessage],
        message: &str,
        profile: &UserProfile,
    ) -> Result<String, CoachError>;
}

/// Gateway used when no API key is configured. Every call fails, so
/// callers take their fixed fallback paths.
pub struct OfflineCoach;

#[async_trait]
impl CoachGateway for OfflineCoach {
    async fn generate_plan(&self, _profile: &UserProfile) -> Result<Vec<String>, CoachError> {
        Err(CoachError::NotConfigured)
    }

    async fn chat_reply(
        &self,
        _history: &[ChatMessage],
        _message: &str,
        _profile: &UserProfile,
    ) -> Result<String, CoachError> {
        Err(CoachError::NotConfigured)
    }
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "momentum";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&ChatRole::Coach).unwrap(), "\"coach\"");
    }

    #[test]
    fn message_ids_are_unique() {
        let a = ChatMessage::new(ChatRole::User, "hi");
        let b = ChatMessage::new(ChatRole::User, "hi");
        assert_ne!(a.id, b.id);
    }
}
