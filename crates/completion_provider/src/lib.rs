//! Minimal provider-agnostic contract for one chat-completion exchange.
//!
//! This crate defines the message shapes handed to a provider, the typed
//! failure taxonomy a provider reports, and the credential seam. It excludes
//! transport details and wire payloads.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Error returned while constructing/configuring a provider before any exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderInitError {
    message: String,
}

impl ProviderInitError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ProviderInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Role of one message in a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    /// Returns the lowercase wire name for this role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-neutral message history item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Input for one completion exchange.
///
/// `history` holds prior turns only; `user_text` is the new message and is
/// appended after it by [`CompletionRequest::messages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub persona: String,
    pub history: Vec<ChatMessage>,
    pub user_text: String,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(
        persona: impl Into<String>,
        history: Vec<ChatMessage>,
        user_text: impl Into<String>,
    ) -> Self {
        Self {
            persona: persona.into(),
            history,
            user_text: user_text.into(),
        }
    }

    /// Returns the ordered message list sent upstream: system persona, then
    /// history in order, then the new user message.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::new(ChatRole::System, self.persona.clone()));
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(self.user_text.clone()));
        messages
    }
}

/// Typed failure of one completion exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("no API credential is configured")]
    NoCredential,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("completion API returned HTTP {0}")]
    ApiStatus(u16),
    #[error("completion API returned a malformed response")]
    MalformedResponse,
}

impl CompletionError {
    /// Returns a message suitable for showing to the user in the transcript.
    ///
    /// Transport details are left out; they belong in logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoCredential => {
                "I can't reply yet: no usable API key is configured for the completion service."
                    .to_string()
            }
            Self::Transport(_) => {
                "I couldn't reach the completion service. Check your connection and try again."
                    .to_string()
            }
            Self::ApiStatus(401 | 403) => {
                "The completion service rejected the API key. Check the key and try again."
                    .to_string()
            }
            Self::ApiStatus(429) => {
                "The completion service is rate limiting requests right now. Wait a moment and try again."
                    .to_string()
            }
            Self::ApiStatus(code) => {
                format!("The completion service returned an error (HTTP {code}). Try again later.")
            }
            Self::MalformedResponse => {
                "The completion service sent a reply I couldn't read. Try again.".to_string()
            }
        }
    }
}

/// Immutable metadata describing a completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_id: String,
    pub model_id: String,
}

/// Provider interface for executing one completion exchange.
///
/// Calls block the calling thread until the exchange resolves; hosts run them
/// off the controlling thread.
pub trait CompletionProvider: Send + Sync + 'static {
    /// Returns provider/model identity metadata.
    fn profile(&self) -> ProviderProfile;

    /// Performs one exchange and returns the trimmed reply text.
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Source of the API credential, consulted once per exchange.
pub trait CredentialSource: Send + Sync {
    /// Returns the credential, or `None` when it is absent.
    fn api_key(&self) -> Option<String>;
}

/// Fixed in-memory credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    #[must_use]
    pub fn absent() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredential {
    fn api_key(&self) -> Option<String> {
        self.0.as_deref().and_then(sanitize_credential)
    }
}

/// Tries each source in order and returns the first present credential.
#[derive(Clone, Default)]
pub struct CredentialChain {
    sources: Vec<Arc<dyn CredentialSource>>,
}

impl CredentialChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.sources.push(source);
        self
    }
}

impl fmt::Debug for CredentialChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialChain")
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl CredentialSource for CredentialChain {
    fn api_key(&self) -> Option<String> {
        self.sources.iter().find_map(|source| source.api_key())
    }
}

/// Trims a raw credential and treats blank values as absent.
#[must_use]
pub fn sanitize_credential(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
