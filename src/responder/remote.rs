//! Remote chat-completions responder
//!
//! Calls a hosted chat-completions API over HTTPS. The active role's
//! system prompt is sent ahead of the user's message so the model answers
//! within that discipline.

use serde::{Deserialize, Serialize};

use crate::responder::{Responder, ResponderError};
use crate::types::config::ResponderConfig;
use crate::types::role::ExpertRole;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
    error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
}

// ============================================================================
// RemoteResponder
// ============================================================================

/// Responder backed by a hosted chat-completions endpoint
pub struct RemoteResponder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl RemoteResponder {
    /// Build a responder from configuration
    ///
    /// Fails when the configuration carries no API key; callers that reach
    /// this point with a missing key should have started the session in its
    /// blocked state instead.
    pub fn new(config: &ResponderConfig) -> Result<Self, ResponderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ResponderError::MissingCredential)?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ResponderError::Request(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    fn build_request(&self, prompt: &str, role: ExpertRole) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                WireMessage {
                    role: "system".to_string(),
                    content: role.system_prompt().to_string(),
                },
                WireMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

#[async_trait::async_trait]
impl Responder for RemoteResponder {
    async fn generate(&self, prompt: &str, role: ExpertRole) -> Result<String, ResponderError> {
        let request = self.build_request(prompt, role);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ResponderError::Request(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ResponderError::Request(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            tracing::warn!("provider returned {} for model {}", status, self.model);
            return Err(ResponderError::Request(format!(
                "Provider error ({status}): {body}"
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ResponderError::Request(format!("Failed to parse response: {e}")))?;

        if let Some(error) = parsed.error {
            return Err(ResponderError::Request(error.message));
        }

        parsed
            .choices
            .and_then(|choices| choices.into_iter().next())
            .map(|choice| choice.message.content)
            .ok_or(ResponderError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let config = ResponderConfig::default();
        assert!(matches!(
            RemoteResponder::new(&config),
            Err(ResponderError::MissingCredential)
        ));
    }

    #[test]
    fn test_request_carries_role_prompt() {
        let responder = RemoteResponder::new(&ResponderConfig::with_key("sk-test")).unwrap();
        let request = responder.build_request("What is clinker?", ExpertRole::Operations);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(
            request.messages[0].content,
            ExpertRole::Operations.system_prompt()
        );
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "What is clinker?");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"Clinker is..."}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        let content = parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .map(|c| c.message.content);
        assert_eq!(content.as_deref(), Some("Clinker is..."));
    }

    #[test]
    fn test_provider_error_parsing() {
        let json = r#"{"error":{"message":"rate limited"}}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.map(|e| e.message).as_deref(), Some("rate limited"));
    }
}
