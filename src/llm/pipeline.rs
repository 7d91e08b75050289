//! Completion pipeline: request assembly, history windowing, vision model
//! pinning, and fallback-on-error.
//!
//! The pipeline captures the mode profile at call time, so a mode switch
//! mid-conversation only affects subsequent requests, never in-flight ones.

use std::sync::Arc;
use tracing::warn;

use super::client::{ChatTurn, CompletionClient, CompletionRequest};
use super::fallback;
use crate::mode::ModeProfile;
use crate::session::{ConversationMessage, ImagePayload};

/// Default history window: the last N messages sent with a text request.
pub const HISTORY_WINDOW: usize = 10;

/// Reduced history window used when an image is attached, bounding the
/// multimodal payload size.
pub const HISTORY_WINDOW_WITH_IMAGE: usize = 5;

/// Higher-capability model pinned for vision requests regardless of mode.
pub const VISION_MODEL: &str = "gpt-4o";

/// Assembles and executes completion requests.
pub struct CompletionPipeline {
    client: Arc<dyn CompletionClient>,
    history_window: usize,
    history_window_with_image: usize,
    vision_model: String,
}

impl CompletionPipeline {
    /// Create a pipeline with the default windows and vision model.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            history_window: HISTORY_WINDOW,
            history_window_with_image: HISTORY_WINDOW_WITH_IMAGE,
            vision_model: VISION_MODEL.to_owned(),
        }
    }

    /// Override the history windows.
    #[must_use]
    pub fn with_windows(mut self, text: usize, with_image: usize) -> Self {
        self.history_window = text;
        self.history_window_with_image = with_image;
        self
    }

    /// Build the request for a user turn. Public for request-shape tests.
    #[must_use]
    pub fn build_request(
        &self,
        user_text: &str,
        history: &[ConversationMessage],
        profile: &ModeProfile,
        image: Option<&ImagePayload>,
    ) -> CompletionRequest {
        let window = if image.is_some() {
            self.history_window_with_image
        } else {
            self.history_window
        };

        let mut turns = Vec::with_capacity(window + 2);
        turns.push(ChatTurn::system(profile.system_prompt));

        let start = history.len().saturating_sub(window);
        for message in &history[start..] {
            // History entries go text-only; only the current turn's image is
            // re-sent, keeping old payloads out of every follow-up request.
            if message.is_from_user {
                turns.push(ChatTurn::user(message.content.clone()));
            } else {
                turns.push(ChatTurn::assistant(message.content.clone()));
            }
        }

        match image {
            Some(payload) => turns.push(ChatTurn::user_with_image(user_text, payload.clone())),
            None => turns.push(ChatTurn::user(user_text)),
        }

        let model = if image.is_some() {
            self.vision_model.clone()
        } else {
            profile.model_id.to_owned()
        };

        CompletionRequest {
            model,
            turns,
            max_tokens: profile.max_tokens,
            temperature: profile.temperature,
        }
    }

    /// Execute a completion for the given user turn.
    ///
    /// Never fails: transport errors, non-2xx statuses, and malformed bodies
    /// are substituted with the deterministic local responder.
    pub async fn complete(
        &self,
        user_text: &str,
        history: &[ConversationMessage],
        profile: &ModeProfile,
        image: Option<&ImagePayload>,
    ) -> String {
        let request = self.build_request(user_text, history, profile, image);

        match self.client.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "completion failed; substituting local responder");
                fallback::local_reply(user_text, profile.focus)
            }
        }
    }
}
