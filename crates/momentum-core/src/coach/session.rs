//! In-memory chat session with the coach.
//!
//! Holds the transcript and the in-flight flag. History is
//! session-scoped and never persisted.

use super::{ChatMessage, ChatRole, CoachGateway, HISTORY_WINDOW};
use crate::error::CoachError;
use crate::profile::UserProfile;

/// Reply shown when the gateway answered but the payload was unusable.
const GARBLED_REPLY: &str = "Sorry, I'm reorganizing my circuits. Try again.";

/// Reply shown when the gateway could not be reached at all.
const OFFLINE_REPLY: &str = "I'm having trouble connecting right now. Keep pushing forward!";

/// A chat conversation between the user and the coach.
pub struct ChatSession {
    profile: UserProfile,
    messages: Vec<ChatMessage>,
    in_flight: bool,
}

impl ChatSession {
    /// Open a session seeded with a welcome message built from the profile.
    pub fn new(profile: &UserProfile) -> Self {
        let welcome = format!(
            "Hi {}! I'm your Momentum coach. I've been looking at your {} profile. \
             How can I help you grow today?",
            profile.name, profile.focus_area
        );
        Self {
            profile: profile.clone(),
            messages: vec![ChatMessage::new(ChatRole::Coach, welcome)],
            in_flight: false,
        }
    }

    /// Full transcript, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a send is currently outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Send a user message and append the coach's reply.
    ///
    /// Empty (after trim) input and sends issued while a request is
    /// outstanding are no-ops returning `None`. Gateway failures never
    /// surface: a fixed fallback line is recorded as the reply instead,
    /// and the in-flight flag is cleared so the user can retry.
    pub async fn send(
        &mut self,
        gateway: &dyn CoachGateway,
        text: &str,
    ) -> Option<&ChatMessage> {
        if text.trim().is_empty() || self.in_flight {
            return None;
        }

        // Context window: the trailing messages from before this send.
        let window_start = self.messages.len().saturating_sub(HISTORY_WINDOW);
        let window: Vec<ChatMessage> = self.messages[window_start..].to_vec();

        self.in_flight = true;
        self.messages.push(ChatMessage::new(ChatRole::User, text));

        let reply = match gateway.chat_reply(&window, text, &self.profile).await {
            Ok(reply) => reply,
            Err(CoachError::MalformedReply(_)) => GARBLED_REPLY.to_string(),
            Err(_) => OFFLINE_REPLY.to_string(),
        };

        self.messages.push(ChatMessage::new(ChatRole::Coach, reply));
        self.in_flight = false;
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted gateway that records the windows it was handed.
    struct ScriptedGateway {
        replies: Mutex<Vec<Result<String, CoachError>>>,
        seen_windows: Mutex<Vec<usize>>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Result<String, CoachError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                seen_windows: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CoachGateway for ScriptedGateway {
        async fn generate_plan(&self, _profile: &UserProfile) -> Result<Vec<String>, CoachError> {
            Ok(Vec::new())
        }

        async fn chat_reply(
            &self,
            history: &[ChatMessage],
            _message: &str,
            _profile: &UserProfile,
        ) -> Result<String, CoachError> {
            self.seen_windows.lock().unwrap().push(history.len());
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Ok("ok".to_string())
            } else {
                replies.remove(0)
            }
        }
    }

    fn profile() -> UserProfile {
        UserProfile::new("Ana", crate::profile::FocusArea::Health, 7, 30)
    }

    #[tokio::test]
    async fn session_opens_with_a_welcome_from_the_coach() {
        let s = ChatSession::new(&profile());
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.messages()[0].role, ChatRole::Coach);
        assert!(s.messages()[0].text.contains("Ana"));
        assert!(s.messages()[0].text.contains("health"));
    }

    #[tokio::test]
    async fn send_appends_user_and_coach_messages() {
        let gw = ScriptedGateway::new(vec![Ok("Keep at it!".to_string())]);
        let mut s = ChatSession::new(&profile());

        let reply = s.send(&gw, "I skipped the gym").await.unwrap();
        assert_eq!(reply.role, ChatRole::Coach);
        assert_eq!(reply.text, "Keep at it!");
        assert_eq!(s.messages().len(), 3); // welcome + user + coach
        assert_eq!(s.messages()[1].role, ChatRole::User);
    }

    #[tokio::test]
    async fn blank_input_is_a_no_op() {
        let gw = ScriptedGateway::new(vec![]);
        let mut s = ChatSession::new(&profile());
        assert!(s.send(&gw, "").await.is_none());
        assert!(s.send(&gw, "   ").await.is_none());
        assert_eq!(s.messages().len(), 1);
        assert!(gw.seen_windows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_while_in_flight_is_refused() {
        let gw = ScriptedGateway::new(vec![]);
        let mut s = ChatSession::new(&profile());
        s.in_flight = true;
        assert!(s.send(&gw, "hello?").await.is_none());
        assert_eq!(s.messages().len(), 1);
    }

    #[tokio::test]
    async fn gateway_failure_records_fallback_and_clears_flag() {
        let gw = ScriptedGateway::new(vec![
            Err(CoachError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
            Ok("Back online.".to_string()),
        ]);
        let mut s = ChatSession::new(&profile());

        let reply = s.send(&gw, "anyone there?").await.unwrap();
        assert_eq!(reply.text, OFFLINE_REPLY);
        assert!(!s.is_in_flight());

        // Flag was released, so a retry goes through.
        let reply = s.send(&gw, "retrying").await.unwrap();
        assert_eq!(reply.text, "Back online.");
    }

    #[tokio::test]
    async fn unusable_payload_gets_its_own_fallback_line() {
        let gw = ScriptedGateway::new(vec![Err(CoachError::MalformedReply("gone".to_string()))]);
        let mut s = ChatSession::new(&profile());
        let reply = s.send(&gw, "hm").await.unwrap();
        assert_eq!(reply.text, GARBLED_REPLY);
    }

    #[tokio::test]
    async fn context_window_holds_at_most_five_prior_messages() {
        let gw = ScriptedGateway::new(vec![]);
        let mut s = ChatSession::new(&profile());

        for i in 0..6 {
            s.send(&gw, &format!("message {i}")).await;
        }

        let windows = gw.seen_windows.lock().unwrap();
        // First send sees the welcome only; later sends cap at the window.
        assert_eq!(windows[0], 1);
        assert_eq!(windows[1], 3);
        assert_eq!(windows[2], 5);
        assert!(windows[3..].iter().all(|&n| n == HISTORY_WINDOW));
    }
}
