use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

#[derive(Debug)]
pub enum ChatCompletionsError {
    MissingApiKey,
    /// The key has bytes that cannot travel in an `Authorization` header.
    InvalidApiKey,
    InvalidEndpoint(String),
    InvalidHeader(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    Decode(JsonError),
    EmptyChoices,
    EmptyContent,
}

impl ChatCompletionsError {
    /// Returns true when the exchange reached the server and got HTTP 200 but
    /// the payload could not be used.
    #[must_use]
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::EmptyChoices | Self::EmptyContent)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(rename = "error")]
    pub value: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayloadFields {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
}

impl fmt::Display for ChatCompletionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "API key is required"),
            Self::InvalidApiKey => {
                write!(f, "API key contains characters not allowed in a header")
            }
            Self::InvalidEndpoint(value) => write!(f, "invalid endpoint URL: {value}"),
            Self::InvalidHeader(message) => write!(f, "invalid request header: {message}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::Decode(error) => write!(f, "response decode error: {error}"),
            Self::EmptyChoices => write!(f, "response contained no choices"),
            Self::EmptyContent => write!(f, "first choice has empty message content"),
        }
    }
}

impl std::error::Error for ChatCompletionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(error) => Some(error),
            Self::Decode(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChatCompletionsError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for ChatCompletionsError {
    fn from(error: JsonError) -> Self {
        Self::Decode(error)
    }
}

/// Extracts a short human-readable message from a non-success response body.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    let fallback = || {
        if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.trim().to_string()
        }
    };

    let Ok(parsed) = serde_json::from_str::<ErrorPayload>(body) else {
        return fallback();
    };

    match parsed.value {
        Some(ErrorPayloadFields {
            message: Some(message),
            ..
        }) if !message.trim().is_empty() => message.trim().to_string(),
        Some(ErrorPayloadFields {
            type_: Some(type_), ..
        }) if !type_.trim().is_empty() => type_.trim().to_string(),
        _ => fallback(),
    }
}
