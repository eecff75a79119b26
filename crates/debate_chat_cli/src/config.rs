//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use debate_chat::sanitize_persona;
use thiserror::Error;

pub const PROVIDER_ENV_VAR: &str = "DEBATE_CHAT_PROVIDER";
pub const ENDPOINT_ENV_VAR: &str = "DEBATE_CHAT_ENDPOINT";
pub const MODEL_ENV_VAR: &str = "DEBATE_CHAT_MODEL";
pub const TIMEOUT_ENV_VAR: &str = "DEBATE_CHAT_TIMEOUT_SEC";
pub const PERSONA_ENV_VAR: &str = "DEBATE_CHAT_PERSONA";
pub const API_KEY_ENV_VAR: &str = "DEBATE_CHAT_API_KEY";
pub const HOME_ENV_VAR: &str = "DEBATE_CHAT_HOME";
pub const LOG_ENV_VAR: &str = "DEBATE_CHAT_LOG";

pub const DEFAULT_PROVIDER_ID: &str = "http";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("DEBATE_CHAT_TIMEOUT_SEC must be a whole number of seconds greater than 0, got '{value}'")]
    InvalidTimeout { value: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub provider_id: String,
    pub endpoint: Option<String>,
    pub model_id: Option<String>,
    pub timeout: Option<Duration>,
    pub persona: String,
    pub api_key: Option<String>,
    pub home: Option<PathBuf>,
    pub log_filter: String,
}

impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfig")
            .field("provider_id", &self.provider_id)
            .field("endpoint", &self.endpoint)
            .field("model_id", &self.model_id)
            .field("timeout", &self.timeout)
            .field("persona", &self.persona)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("home", &self.home)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            provider_id: env_string_opt(PROVIDER_ENV_VAR)
                .map(|value| value.to_ascii_lowercase())
                .unwrap_or_else(|| DEFAULT_PROVIDER_ID.to_string()),
            endpoint: env_string_opt(ENDPOINT_ENV_VAR),
            model_id: env_string_opt(MODEL_ENV_VAR),
            timeout: parse_timeout(env_string_opt(TIMEOUT_ENV_VAR))?,
            persona: sanitize_persona(env::var(PERSONA_ENV_VAR).ok()),
            api_key: env_string_opt(API_KEY_ENV_VAR),
            home: env_string_opt(HOME_ENV_VAR).map(PathBuf::from),
            log_filter: env_string_opt(LOG_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    /// Settings directory: the override, else the platform config directory.
    #[must_use]
    pub fn settings_dir(&self) -> Option<PathBuf> {
        settings_store::settings_root(self.home.as_deref())
    }
}

fn parse_timeout(raw: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(Some(Duration::from_secs(seconds))),
        _ => Err(ConfigError::InvalidTimeout { value: raw }),
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
