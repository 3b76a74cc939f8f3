//! Configuration types
//!
//! Settings for the remote AI backend. The API key is the single required
//! secret: when it is absent at startup the chat session starts in its
//! blocked state and every send is refused.

use serde::{Deserialize, Serialize};

/// Environment variable holding the provider API key
pub const API_KEY_ENV: &str = "PLANTCHAT_API_KEY";
/// Environment variable overriding the model id
pub const MODEL_ENV: &str = "PLANTCHAT_MODEL";
/// Environment variable overriding the chat-completions endpoint
pub const ENDPOINT_ENV: &str = "PLANTCHAT_ENDPOINT";

/// Default model to use
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.2-3b-instruct:free";
/// Default chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Remote responder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Provider API key; `None` means the session cannot send at all
    pub api_key: Option<String>,
    /// Model identifier passed to the provider
    pub model: String,
    /// Chat-completions endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 120,
        }
    }
}

impl ResponderConfig {
    /// Build a configuration from the environment
    ///
    /// Missing or empty optional variables fall back to defaults. A missing
    /// key is not an error here; it surfaces as the blocked session state.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::error!("{} is not set; chat will be disabled", API_KEY_ENV);
        }

        let mut config = Self {
            api_key,
            ..Self::default()
        };
        if let Ok(model) = std::env::var(MODEL_ENV) {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                config.endpoint = endpoint;
            }
        }
        config
    }

    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResponderConfig::default();
        assert!(config.api_key.is_none());
        assert!(!config.has_credential());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_with_key_has_credential() {
        let config = ResponderConfig::with_key("sk-test");
        assert!(config.has_credential());
    }

    #[test]
    fn test_blank_key_is_no_credential() {
        let mut config = ResponderConfig::default();
        config.api_key = Some("   ".to_string());
        assert!(!config.has_credential());
    }
}
