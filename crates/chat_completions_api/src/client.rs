use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::ChatCompletionsConfig;
use crate::error::{parse_error_message, ChatCompletionsError};
use crate::headers::{build_headers, HEADER_AUTHORIZATION};
use crate::payload::{ChatCompletionRequest, ChatCompletionResponse};
use crate::url::normalize_endpoint;

#[derive(Debug)]
pub struct ChatCompletionsClient {
    http: Client,
    config: ChatCompletionsConfig,
    endpoint: Url,
}

impl ChatCompletionsClient {
    pub fn new(config: ChatCompletionsConfig) -> Result<Self, ChatCompletionsError> {
        let normalized = normalize_endpoint(&config.endpoint);
        let endpoint = Url::parse(&normalized)
            .map_err(|error| ChatCompletionsError::InvalidEndpoint(format!("{normalized}: {error}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ChatCompletionsError::InvalidEndpoint(format!(
                "{normalized}: unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ChatCompletionsError::from)?;
        Ok(Self {
            http,
            config,
            endpoint,
        })
    }

    pub fn config(&self) -> &ChatCompletionsConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn build_headers(&self) -> Result<HeaderMap, ChatCompletionsError> {
        let headers = build_headers(&self.config)?;
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    ChatCompletionsError::InvalidHeader(format!("invalid header key: {key}"))
                })?,
                HeaderValue::from_str(&value).map_err(|_| {
                    if key == HEADER_AUTHORIZATION {
                        ChatCompletionsError::InvalidApiKey
                    } else {
                        ChatCompletionsError::InvalidHeader(format!(
                            "invalid header value for {key}"
                        ))
                    }
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_request(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<reqwest::RequestBuilder, ChatCompletionsError> {
        let headers = self.build_headers()?;
        let mut payload = request.clone();
        payload.stream = false;
        Ok(self
            .http
            .post(self.endpoint.clone())
            .headers(headers)
            .json(&payload))
    }

    /// Performs one exchange and returns the parsed success body.
    ///
    /// Any status other than 200 is an error, as is a 200 whose body does not
    /// decode or carries no choices.
    pub async fn send(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatCompletionsError> {
        let builder = self.build_request(request)?;
        tracing::debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let response = builder.send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let message = parse_error_message(status, &body);
            tracing::warn!(status = status.as_u16(), %message, "chat completion request failed");
            return Err(ChatCompletionsError::Status(status, message));
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<ChatCompletionResponse>(&body)?;
        if parsed.choices.is_empty() {
            return Err(ChatCompletionsError::EmptyChoices);
        }

        Ok(parsed)
    }

    /// Performs one exchange and returns the first choice's trimmed content.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<String, ChatCompletionsError> {
        let response = self.send(request).await?;
        extract_reply(&response)
    }
}

fn extract_reply(response: &ChatCompletionResponse) -> Result<String, ChatCompletionsError> {
    if response.choices.is_empty() {
        return Err(ChatCompletionsError::EmptyChoices);
    }

    let reply = response.first_content().map(str::trim).unwrap_or_default();
    if reply.is_empty() {
        return Err(ChatCompletionsError::EmptyContent);
    }

    Ok(reply.to_string())
}
