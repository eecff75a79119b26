use std::collections::BTreeMap;

use crate::config::ChatCompletionsConfig;
use crate::error::ChatCompletionsError;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_USER_AGENT: &str = "user-agent";

/// Build a deterministic header map for chat-completion requests.
pub fn build_headers(
    config: &ChatCompletionsConfig,
) -> Result<BTreeMap<String, String>, ChatCompletionsError> {
    let api_key = config.api_key.trim();
    if api_key.is_empty() {
        return Err(ChatCompletionsError::MissingApiKey);
    }

    let mut headers = BTreeMap::new();
    headers.insert(
        HEADER_AUTHORIZATION.to_owned(),
        format!("Bearer {api_key}"),
    );
    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        "application/json".to_owned(),
    );
    headers.insert(HEADER_ACCEPT.to_owned(), "application/json".to_owned());

    let ua = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(default_user_agent);
    headers.insert(HEADER_USER_AGENT.to_owned(), ua);

    for (key, value) in &config.extra_headers {
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    Ok(headers)
}

fn default_user_agent() -> String {
    format!(
        "debate-chat/{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
