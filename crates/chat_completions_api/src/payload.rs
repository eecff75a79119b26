use serde::{Deserialize, Serialize};

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
/// Fixed sampling temperature.
pub const TEMPERATURE: f64 = 0.7;
/// Fixed completion length cap.
pub const MAX_TOKENS: u32 = 1024;
/// Fixed nucleus-sampling mass.
pub const TOP_P: f64 = 1.0;

/// Wire role of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
}

impl WireMessage {
    pub fn new(role: WireRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Request payload for the chat-completions endpoint.
///
/// `stop` serializes as `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<WireMessage>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub stop: Option<Vec<String>>,
    /// Default: false.
    #[serde(default)]
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Builds a request with the fixed generation parameters.
    pub fn new(model: impl Into<String>, messages: Vec<WireMessage>) -> Self {
        Self {
            messages,
            model: model.into(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
            stop: None,
            stream: false,
        }
    }
}

/// Success response body. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Returns the first choice's content, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}
