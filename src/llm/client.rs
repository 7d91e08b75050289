//! Remote completion collaborator.
//!
//! [`HttpCompletionClient`] talks to an OpenAI-compatible chat-completions
//! endpoint; vision turns carry the image as a structured multi-part content
//! block with an inline base64 data URL. The client maps transport errors,
//! non-2xx statuses, and malformed bodies to [`MuseError::Llm`] — the
//! pipeline above it substitutes the local fallback responder, so none of
//! these errors ever reach the UI.

use async_trait::async_trait;
use base64::Engine as _;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{MuseError, Result};
use crate::session::ImagePayload;

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    /// System instructions.
    System,
    /// User input.
    User,
    /// Model output.
    Assistant,
}

impl ChatRole {
    fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One role-tagged turn of a completion request.
///
/// Most turns are plain text; a user turn may additionally carry an inline
/// image for vision requests.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    /// Who sent this turn.
    pub role: ChatRole,
    /// Turn text.
    pub text: String,
    /// Optional inline image (user turns only).
    pub image: Option<ImagePayload>,
}

impl ChatTurn {
    /// Create a system turn.
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            text: text.into(),
            image: None,
        }
    }

    /// Create a user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            image: None,
        }
    }

    /// Create an assistant turn.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            image: None,
        }
    }

    /// Create a user turn with an attached image.
    #[must_use]
    pub fn user_with_image(text: impl Into<String>, image: ImagePayload) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            image: Some(image),
        }
    }

    /// Wire representation. Text-only turns serialize `content` as a plain
    /// string; image turns as a multi-part content block array.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match &self.image {
            None => serde_json::json!({
                "role": self.role.as_str(),
                "content": self.text,
            }),
            Some(image) => serde_json::json!({
                "role": self.role.as_str(),
                "content": [
                    { "type": "text", "text": self.text },
                    {
                        "type": "image_url",
                        "image_url": {
                            "url": format!(
                                "data:{};base64,{}",
                                image.media_type, image.base64_data
                            )
                        }
                    }
                ],
            }),
        }
    }
}

/// A fully assembled completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Ordered turns: system, bounded history window, current user turn.
    pub turns: Vec<ChatTurn>,
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Wire representation of the request body.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": self.turns.iter().map(ChatTurn::to_json).collect::<Vec<_>>(),
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        })
    }

    /// `true` when any turn carries an image.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.turns.iter().any(|t| t.image.is_some())
    }
}

/// Remote completion collaborator interface.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Execute a completion request, returning the model's reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// HTTP client for OpenAI-compatible chat-completions endpoints.
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCompletionClient {
    /// Create a client with the given API key and per-request timeout.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MuseError::Llm(format!("completion client build failed: {e}")))?;
        Ok(Self {
            http,
            base_url: "https://api.openai.com".to_owned(),
            api_key: api_key.into(),
        })
    }

    /// Override the base URL (used by mock-server tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(
            request_id = request_id.as_str(),
            model = request.model.as_str(),
            turns = request.turns.len(),
            max_tokens = request.max_tokens,
            vision = request.has_image(),
            "completion request"
        );

        let mut http_request = self
            .http
            .post(&url)
            .header("x-request-id", &request_id)
            .json(&request.to_json());
        if !self.api_key.is_empty() {
            http_request = http_request.bearer_auth(&self.api_key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| MuseError::Llm(format!("completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MuseError::Llm(format!(
                "completion endpoint returned {status}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MuseError::Llm(format!("completion response decode failed: {e}")))?;

        let text = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                MuseError::Llm("completion response missing message content".to_owned())
            })?
            .to_owned();

        info!(
            request_id = request_id.as_str(),
            reply_chars = text.len(),
            "completion succeeded"
        );
        Ok(text)
    }
}

/// Encode raw image bytes into an [`ImagePayload`] for a vision turn.
#[must_use]
pub fn encode_image(media_type: impl Into<String>, bytes: &[u8]) -> ImagePayload {
    ImagePayload {
        media_type: media_type.into(),
        base64_data: base64::engine::general_purpose::STANDARD.encode(bytes),
    }
}
