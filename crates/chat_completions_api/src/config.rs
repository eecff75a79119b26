use std::collections::BTreeMap;
use std::time::Duration;

use crate::url::DEFAULT_ENDPOINT;

/// Transport configuration for chat-completion requests.
#[derive(Clone)]
pub struct ChatCompletionsConfig {
    /// Bearer credential passed to `Authorization`.
    pub api_key: String,
    /// Endpoint or base URL; normalized before each request.
    pub endpoint: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional request timeout. `None` lets a hung transport hang the exchange.
    pub timeout: Option<Duration>,
}

impl Default for ChatCompletionsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

impl std::fmt::Debug for ChatCompletionsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("user_agent", &self.user_agent)
            .field("extra_headers", &self.extra_headers)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ChatCompletionsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }
}
