//! OpenAI-compatible chat-completions provider.

use crate::prompts::build_messages;
use crate::provider::{ConversationProvider, ConversationRequest};
use crate::retry::{with_retry, RetryConfig};
use anyhow::{Context, Result};
use heartline_core::config::AiConfig;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    retry: RetryConfig,
}

impl OpenAiProvider {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .context("AI provider needs an API key")?;

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs.max(1)))
                .build()?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            retry: RetryConfig::with_attempts(config.max_attempts),
        })
    }

    fn payload(&self, request: &ConversationRequest<'_>) -> Value {
        json!({
            "model": self.model,
            "messages": build_messages(request),
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        })
    }
}

/// Pull the reply text out of a chat-completions response body.
fn parse_reply(body: &Value) -> Result<String> {
    let text = body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .unwrap_or_default();
    if text.is_empty() {
        anyhow::bail!("completion response had no text content");
    }
    Ok(text.to_string())
}

#[async_trait::async_trait]
impl ConversationProvider for OpenAiProvider {
    async fn respond(&self, request: &ConversationRequest<'_>) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = self.payload(request);

        let response = with_retry(&self.retry, "OpenAI", || {
            let pending = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&payload);
            async move { pending.send().await.map_err(anyhow::Error::from) }
        })
        .await?;

        let body: Value = response
            .json()
            .await
            .context("Failed to decode completion response")?;
        let reply = parse_reply(&body)?;
        tracing::debug!("{} replied via {} ({} chars)", request.profile.id, self.model, reply.len());
        Ok(reply)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartline_core::{CharacterId, RelationshipRecord, Roster};

    fn config() -> AiConfig {
        AiConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "http://localhost:1234/v1/".to_string(),
            ..AiConfig::default()
        }
    }

    #[test]
    fn test_requires_key() {
        assert!(OpenAiProvider::new(&AiConfig::default()).is_err());
        let blank = AiConfig {
            api_key: Some(" ".to_string()),
            ..AiConfig::default()
        };
        assert!(OpenAiProvider::new(&blank).is_err());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let provider = OpenAiProvider::new(&config()).unwrap();
        assert_eq!(provider.base_url, "http://localhost:1234/v1");
    }

    #[test]
    fn test_payload_shape() {
        let provider = OpenAiProvider::new(&config()).unwrap();
        let roster = Roster::builtin().unwrap();
        let record = RelationshipRecord::new(CharacterId::Juniper);
        let request = ConversationRequest {
            profile: roster.get(CharacterId::Juniper).unwrap(),
            record: &record,
            message: "what's your favourite plant?",
            history: &[],
        };
        let payload = provider.payload(&request);
        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["max_tokens"], 300);
        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "what's your favourite plant?");
    }

    #[test]
    fn test_parse_reply() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "  Hello there. " } }]
        });
        assert_eq!(parse_reply(&body).unwrap(), "Hello there.");
        assert!(parse_reply(&json!({ "choices": [] })).is_err());
        assert!(parse_reply(&json!({
            "choices": [{ "message": { "content": "" } }]
        }))
        .is_err());
    }
}
