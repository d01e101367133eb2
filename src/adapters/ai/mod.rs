//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `AnthropicProvider` - Anthropic Claude models

mod anthropic_provider;
mod mock_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};

use secrecy::ExposeSecret;
use std::sync::Arc;

use crate::config::{AiConfig, AiProvider};
use crate::ports::{AIError, AIProvider};

/// Builds the provider selected in configuration.
pub fn provider_from_config(config: &AiConfig) -> Result<Arc<dyn AIProvider>, AIError> {
    match config.provider {
        AiProvider::Mock => Ok(Arc::new(MockAIProvider::new())),
        AiProvider::Anthropic => {
            let key = config
                .anthropic_api_key
                .as_ref()
                .map(|k| k.expose_secret().clone())
                .filter(|k| !k.is_empty())
                .ok_or(AIError::AuthenticationFailed)?;

            let mut anthropic = AnthropicConfig::new(key)
                .with_model(config.model.clone())
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(base_url) = &config.base_url {
                anthropic = anthropic.with_base_url(base_url.clone());
            }
            Ok(Arc::new(AnthropicProvider::new(anthropic)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    #[test]
    fn mock_is_the_default_provider() {
        let provider = provider_from_config(&AiConfig::default()).unwrap();
        assert_eq!(provider.provider_info().name, "mock");
    }

    #[test]
    fn anthropic_without_key_is_rejected() {
        let config = AiConfig {
            provider: AiProvider::Anthropic,
            ..Default::default()
        };
        assert!(matches!(
            provider_from_config(&config),
            Err(AIError::AuthenticationFailed)
        ));
    }

    #[test]
    fn anthropic_with_key_uses_configured_model() {
        let config = AiConfig {
            provider: AiProvider::Anthropic,
            anthropic_api_key: Some(Secret::new("sk-ant-test".to_string())),
            model: "claude-test".to_string(),
            ..Default::default()
        };
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.provider_info().model, "claude-test");
    }
}
