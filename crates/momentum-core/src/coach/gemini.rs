//! Gemini-backed implementation of the coach gateway.
//!
//! Talks to the Google Generative Language REST API with an API key from
//! the OS keyring. Plan requests run in JSON mode and are parsed as an
//! array of task titles; chat requests send one composed context prompt
//! and return the reply text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

use super::{keyring_store, ChatMessage, ChatRole, CoachGateway};
use crate::error::CoachError;
use crate::profile::UserProfile;
use crate::storage::Config;

/// Keyring entry holding the API key.
pub const API_KEY_NAME: &str = "gemini_api_key";

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

const SYSTEM_INSTRUCTION: &str = "\
You are the \"Momentum Coach\", a high-performance personal assistant grounded in \
behavioral psychology, productivity, and gamification.
Your tone must be:
1. Motivating but realistic (light stoic philosophy).
2. Short and direct (at most 3 short paragraphs).
3. Emojis in moderation to keep things light.
4. Focused on \"Action\" and \"Micro-habits\".

The user is trying to improve their life. If they report a failure, be \
understanding but suggest an immediate correction. If they report a success, \
celebrate it.";

pub struct GeminiCoach {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiCoach {
    /// Build a client from configuration, with the API key read from the
    /// OS keyring.
    pub fn from_config(config: &Config) -> Result<Self, CoachError> {
        let api_key = keyring_store::get(API_KEY_NAME)
            .map_err(|e| CoachError::Credentials(e.to_string()))?
            .ok_or(CoachError::NotConfigured)?;

        let mut coach = Self::new(api_key, &config.coach.model)?;
        if let Some(base) = &config.coach.api_base {
            coach = coach.with_api_base(base)?;
        }
        coach.client = Client::builder()
            .timeout(Duration::from_secs(config.coach.request_timeout_secs))
            .build()?;
        Ok(coach)
    }

    /// Build a client with an explicit key and model against the default
    /// API endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, CoachError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CoachError::NotConfigured);
        }
        Ok(Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API base (regional endpoints,
    /// proxies, test servers).
    pub fn with_api_base(mut self, base: &str) -> Result<Self, CoachError> {
        Url::parse(base).map_err(|e| CoachError::InvalidEndpoint {
            url: base.to_string(),
            message: e.to_string(),
        })?;
        self.api_base = base.trim_end_matches('/').to_string();
        Ok(self)
    }

    fn endpoint(&self) -> Result<Url, CoachError> {
        let mut url = Url::parse(&self.api_base).map_err(|e| CoachError::InvalidEndpoint {
            url: self.api_base.clone(),
            message: e.to_string(),
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| CoachError::InvalidEndpoint {
                url: self.api_base.clone(),
                message: "URL cannot be a base".to_string(),
            })?;
            segments.pop_if_empty();
            segments.push("v1beta");
            segments.push("models");
            segments.push(&format!("{}:generateContent", self.model));
        }
        Ok(url)
    }

    /// POST one generateContent request and pull out the first candidate's
    /// text (empty string when the candidate carries no text parts).
    async fn request_text(&self, body: serde_json::Value) -> Result<String, CoachError> {
        let endpoint = self.endpoint()?;
        let response = self
            .client
            .post(endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.text().await?;

        if !status.is_success() {
            return Err(CoachError::Api {
                status: status.as_u16(),
                message: payload,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&payload)
            .map_err(|e| CoachError::MalformedReply(format!("invalid payload: {e}")))?;

        let candidate = parsed
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| CoachError::MalformedReply("response has no candidates".to_string()))?;

        let text = candidate
            .content
            .and_then(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        Ok(text)
    }
}

#[async_trait]
impl CoachGateway for GeminiCoach {
    async fn generate_plan(&self, profile: &UserProfile) -> Result<Vec<String>, CoachError> {
        let prompt = format!(
            "Create a daily plan of 3 simple micro-tasks for a person with the following profile:\n\
             Name: {}\n\
             Main focus: {}\n\
             Discipline level (1-10): {}\n\
             Available time: {} minutes.\n\n\
             Return ONLY a JSON array of strings, no markdown, e.g. [\"Drink water\", \"Read 5 min\"].",
            profile.name, profile.focus_area, profile.discipline_level, profile.available_minutes
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let text = self.request_text(body).await?;
        // An empty reply is treated as an empty plan, not a failure.
        let text = if text.trim().is_empty() { "[]" } else { text.trim() };
        serde_json::from_str(text)
            .map_err(|e| CoachError::MalformedReply(format!("expected a JSON array of strings: {e}")))
    }

    async fn chat_reply(
        &self,
        history: &[ChatMessage],
        message: &str,
        profile: &UserProfile,
    ) -> Result<String, CoachError> {
        let mut context = String::from(SYSTEM_INSTRUCTION);
        context.push_str(&format!(
            "\n\nUser profile:\nName: {}\nGoal: {}\n\nRecent history:\n",
            profile.name, profile.focus_area
        ));
        for entry in history {
            let speaker = match entry.role {
                ChatRole::User => "User",
                ChatRole::Coach => "Coach",
            };
            context.push_str(&format!("{speaker}: {}\n", entry.text));
        }
        context.push_str(&format!("\nUser: {message}\nCoach:\n"));

        let body = json!({
            "contents": [{ "parts": [{ "text": context }] }]
        });

        let reply = self.request_text(body).await?;
        if reply.trim().is_empty() {
            return Err(CoachError::MalformedReply("empty reply text".to_string()));
        }
        Ok(reply)
    }
}

#[derive(Debug, serde::Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, serde::Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, serde::Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ContentPart>>,
}

#[derive(Debug, serde::Deserialize)]
struct ContentPart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_model_and_action() {
        let coach = GeminiCoach::new("key", "gemini-3-flash-preview").unwrap();
        let url = coach.endpoint().unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn trailing_slash_on_base_does_not_double_up() {
        let coach = GeminiCoach::new("key", "m")
            .unwrap()
            .with_api_base("http://127.0.0.1:9999/")
            .unwrap();
        let url = coach.endpoint().unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9999/v1beta/models/m:generateContent");
    }

    #[test]
    fn rejects_empty_api_key() {
        assert!(matches!(
            GeminiCoach::new("", "m"),
            Err(CoachError::NotConfigured)
        ));
        assert!(matches!(
            GeminiCoach::new("   ", "m"),
            Err(CoachError::NotConfigured)
        ));
    }

    #[test]
    fn rejects_unparseable_api_base() {
        let coach = GeminiCoach::new("key", "m").unwrap();
        assert!(matches!(
            coach.with_api_base("not a url"),
            Err(CoachError::InvalidEndpoint { .. })
        ));
    }
}
