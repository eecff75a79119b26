//! HTTP-backed implementation of the shared `completion_provider` contract.
//!
//! This adapter looks up the credential for each exchange, translates the
//! provider-neutral request into the `chat_completions_api` wire payload, and
//! folds transport errors into the [`CompletionError`] taxonomy.

use std::sync::Arc;
use std::time::Duration;

use chat_completions_api::payload::{WireRole, DEFAULT_MODEL};
use chat_completions_api::url::DEFAULT_ENDPOINT;
use chat_completions_api::{
    ChatCompletionRequest, ChatCompletionsClient, ChatCompletionsConfig, ChatCompletionsError,
    WireMessage,
};
use completion_provider::{
    ChatMessage, ChatRole, CompletionError, CompletionProvider, CompletionRequest,
    CredentialSource, ProviderInitError, ProviderProfile,
};

/// Stable provider identifier used by startup selection.
pub const HTTP_PROVIDER_ID: &str = "http";

/// Runtime configuration for the HTTP provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProviderConfig {
    pub endpoint: String,
    pub model_id: String,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model_id: DEFAULT_MODEL.to_string(),
            timeout: None,
            user_agent: None,
        }
    }
}

impl HttpProviderConfig {
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn chat_config(&self, api_key: String) -> ChatCompletionsConfig {
        let mut config = ChatCompletionsConfig::new(api_key).with_endpoint(self.endpoint.clone());

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }

        config
    }
}

trait ExchangeClient: Send + Sync {
    fn complete(
        &self,
        config: ChatCompletionsConfig,
        request: &ChatCompletionRequest,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug)]
struct DefaultExchangeClient;

impl ExchangeClient for DefaultExchangeClient {
    fn complete(
        &self,
        config: ChatCompletionsConfig,
        request: &ChatCompletionRequest,
    ) -> Result<String, CompletionError> {
        let client = ChatCompletionsClient::new(config).map_err(map_exchange_error)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                CompletionError::Transport(format!("failed to initialize tokio runtime: {error}"))
            })?;

        runtime
            .block_on(client.complete(request))
            .map_err(map_exchange_error)
    }
}

/// `CompletionProvider` backed by `chat_completions_api` transport primitives.
pub struct HttpCompletionProvider {
    config: HttpProviderConfig,
    credentials: Arc<dyn CredentialSource>,
    exchange: Arc<dyn ExchangeClient>,
}

impl HttpCompletionProvider {
    /// Creates a provider using real HTTP transport.
    ///
    /// The endpoint is validated here; the credential is not, since it is
    /// looked up again on every exchange.
    pub fn new(
        config: HttpProviderConfig,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, ProviderInitError> {
        let config = sanitize_config(config);
        ChatCompletionsClient::new(config.chat_config(String::new())).map_err(map_init_error)?;

        Ok(Self {
            config,
            credentials,
            exchange: Arc::new(DefaultExchangeClient),
        })
    }

    #[must_use]
    pub fn config(&self) -> &HttpProviderConfig {
        &self.config
    }

    #[cfg(test)]
    fn with_exchange_client_for_tests(
        config: HttpProviderConfig,
        credentials: Arc<dyn CredentialSource>,
        exchange: Arc<dyn ExchangeClient>,
    ) -> Self {
        Self {
            config: sanitize_config(config),
            credentials,
            exchange,
        }
    }
}

impl CompletionProvider for HttpCompletionProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: HTTP_PROVIDER_ID.to_string(),
            model_id: self.config.model_id.clone(),
        }
    }

    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let Some(api_key) = self.credentials.api_key() else {
            tracing::warn!("completion skipped: no API credential available");
            return Err(CompletionError::NoCredential);
        };

        let payload = ChatCompletionRequest::new(
            self.config.model_id.clone(),
            to_wire_messages(&request.messages()),
        );

        tracing::debug!(
            model = %payload.model,
            messages = payload.messages.len(),
            "dispatching completion exchange"
        );
        let outcome = self
            .exchange
            .complete(self.config.chat_config(api_key), &payload);

        if let Err(error) = &outcome {
            tracing::warn!(%error, "completion exchange failed");
        }

        outcome
    }
}

fn to_wire_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
    messages
        .iter()
        .map(|message| {
            let role = match message.role {
                ChatRole::System => WireRole::System,
                ChatRole::User => WireRole::User,
                ChatRole::Assistant => WireRole::Assistant,
            };
            WireMessage::new(role, message.content.clone())
        })
        .collect()
}

fn map_exchange_error(error: ChatCompletionsError) -> CompletionError {
    match error {
        ChatCompletionsError::MissingApiKey | ChatCompletionsError::InvalidApiKey => {
            CompletionError::NoCredential
        }
        ChatCompletionsError::Status(status, _) => CompletionError::ApiStatus(status.as_u16()),
        ChatCompletionsError::Decode(_)
        | ChatCompletionsError::EmptyChoices
        | ChatCompletionsError::EmptyContent => CompletionError::MalformedResponse,
        ChatCompletionsError::Request(error) => CompletionError::Transport(error.to_string()),
        ChatCompletionsError::InvalidEndpoint(message)
        | ChatCompletionsError::InvalidHeader(message) => CompletionError::Transport(message),
    }
}

fn sanitize_config(mut config: HttpProviderConfig) -> HttpProviderConfig {
    let model_id = config.model_id.trim();
    config.model_id = if model_id.is_empty() {
        DEFAULT_MODEL.to_string()
    } else {
        model_id.to_string()
    };
    config.timeout = config.timeout.filter(|timeout| !timeout.is_zero());
    config.user_agent = config
        .user_agent
        .map(|user_agent| user_agent.trim().to_string())
        .filter(|user_agent| !user_agent.is_empty());
    config
}

fn map_init_error(error: ChatCompletionsError) -> ProviderInitError {
    ProviderInitError::new(format!("Failed to initialize http provider: {error}"))
}
