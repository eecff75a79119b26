use std::path::Path;
use std::sync::Arc;

use completion_provider::{
    CompletionProvider, CredentialChain, ProviderInitError, StaticCredential,
};
use completion_provider_http::{HttpCompletionProvider, HttpProviderConfig, HTTP_PROVIDER_ID};
use completion_provider_mock::{MockProvider, MOCK_PROVIDER_ID};
use settings_store::StoredCredential;

use crate::config::EnvConfig;

/// Builds the provider named by `config.provider_id`.
///
/// For the HTTP provider the environment key takes precedence over the
/// secret store in `settings_dir`.
pub fn provider_from_config(
    config: &EnvConfig,
    settings_dir: Option<&Path>,
) -> Result<Arc<dyn CompletionProvider>, ProviderInitError> {
    match config.provider_id.as_str() {
        HTTP_PROVIDER_ID => {
            let provider_config = http_config(config);

            let mut credentials = CredentialChain::new();
            if let Some(api_key) = &config.api_key {
                credentials = credentials.with_source(Arc::new(StaticCredential::new(api_key.clone())));
            }
            if let Some(dir) = settings_dir {
                credentials = credentials.with_source(Arc::new(StoredCredential::new(dir)));
            }

            let provider = HttpCompletionProvider::new(provider_config, Arc::new(credentials))?;
            Ok(Arc::new(provider))
        }
        MOCK_PROVIDER_ID => Ok(Arc::new(MockProvider::default())),
        unknown => Err(ProviderInitError::new(format!(
            "Unsupported provider '{unknown}'. Available providers: {HTTP_PROVIDER_ID}, {MOCK_PROVIDER_ID}"
        ))),
    }
}

fn http_config(config: &EnvConfig) -> HttpProviderConfig {
    let mut provider_config = HttpProviderConfig::default().with_user_agent(format!(
        "debate-chat-cli/{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    ));
    if let Some(endpoint) = &config.endpoint {
        provider_config = provider_config.with_endpoint(endpoint.clone());
    }
    if let Some(model_id) = &config.model_id {
        provider_config = provider_config.with_model_id(model_id.clone());
    }
    if let Some(timeout) = config.timeout {
        provider_config = provider_config.with_timeout(timeout);
    }
    provider_config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LOG_FILTER;

    fn config(provider_id: &str) -> EnvConfig {
        EnvConfig {
            provider_id: provider_id.to_string(),
            endpoint: None,
            model_id: None,
            timeout: None,
            persona: "persona".to_string(),
            api_key: None,
            home: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    #[test]
    fn mock_provider_resolves() {
        let provider = provider_from_config(&config("mock"), None).expect("mock provider");
        assert_eq!(provider.profile().provider_id, MOCK_PROVIDER_ID);
    }

    #[test]
    fn http_provider_resolves_with_model_override() {
        let mut config = config("http");
        config.model_id = Some("mixtral-8x7b".to_string());
        config.api_key = Some("key".to_string());

        let provider = provider_from_config(&config, Some(Path::new("/nonexistent")))
            .expect("http provider");
        let profile = provider.profile();
        assert_eq!(profile.provider_id, HTTP_PROVIDER_ID);
        assert_eq!(profile.model_id, "mixtral-8x7b");
    }

    #[test]
    fn http_config_carries_overrides_and_cli_user_agent() {
        let mut config = config("http");
        config.endpoint = Some("http://127.0.0.1:9/v1".to_string());
        config.timeout = Some(std::time::Duration::from_secs(3));

        let provider_config = http_config(&config);
        assert_eq!(provider_config.endpoint, "http://127.0.0.1:9/v1");
        assert_eq!(provider_config.timeout, Some(std::time::Duration::from_secs(3)));
        assert!(provider_config
            .user_agent
            .as_deref()
            .is_some_and(|user_agent| user_agent.starts_with("debate-chat-cli/")));
    }

    #[test]
    fn invalid_endpoint_is_reported_at_startup() {
        let mut config = config("http");
        config.endpoint = Some("ftp://example.com/v1".to_string());

        let error = match provider_from_config(&config, None) {
            Ok(_) => panic!("invalid endpoint should fail"),
            Err(error) => error,
        };
        assert!(error.message().contains("Failed to initialize http provider"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let error = match provider_from_config(&config("custom"), None) {
            Ok(_) => panic!("unknown providers should fail"),
            Err(error) => error,
        };

        assert!(error.message().contains("Unsupported provider 'custom'"));
    }
}
