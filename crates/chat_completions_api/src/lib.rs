//! Transport-only client primitives for OpenAI-compatible chat-completion
//! endpoints.
//!
//! This crate owns request building, the single POST exchange, and response
//! parsing. It contains no credential lookup and no UI coupling; callers hand
//! it a ready API key through [`ChatCompletionsConfig`].
//!
//! Exchanges are never retried here.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod payload;
pub mod url;

pub use client::ChatCompletionsClient;
pub use config::ChatCompletionsConfig;
pub use error::ChatCompletionsError;
pub use payload::{ChatCompletionRequest, ChatCompletionResponse, WireMessage};
pub use reqwest::StatusCode;
pub use url::normalize_endpoint;
