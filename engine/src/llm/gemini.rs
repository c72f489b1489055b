//! Gemini provider
//!
//! Talks to the Gemini `generateContent` REST API. The API key is resolved
//! from the OS keychain *before* the provider is constructed (see
//! `handlers`), so a missing key is a configuration error upstream of the
//! reply pipeline, never a mid-conversation failure.

use super::{LLMError, LLMProvider, Message};
use crate::config::GeminiConfig;
use async_trait::async_trait;
use serde_json::json;

pub struct GeminiProvider {
    config: GeminiConfig,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig, api_key: String) -> Self {
        Self {
            config,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn check_health(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, messages: &[Message]) -> super::Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.api_key
        );

        let mut contents = Vec::new();
        let mut system_instruction = None;

        for msg in messages {
            if msg.role == super::MessageRole::System {
                system_instruction = Some(json!({
                    "parts": [{"text": msg.content}]
                }));
                continue;
            }

            contents.push(json!({
                "role": if msg.role == super::MessageRole::Assistant { "model" } else { "user" },
                "parts": [{"text": msg.content}]
            }));
        }

        let mut payload = serde_json::Map::new();
        payload.insert("contents".to_string(), json!(contents));

        if let Some(sys) = system_instruction {
            payload.insert("systemInstruction".to_string(), sys);
        }

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            if status.as_u16() == 400 || status.as_u16() == 404 {
                return Err(LLMError::InvalidRequest(text));
            } else if status.as_u16() == 429 {
                return Err(LLMError::RateLimitExceeded);
            } else if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(LLMError::AuthenticationFailed(text));
            } else {
                return Err(LLMError::ProviderUnavailable(format!(
                    "Gemini API error ({}): {}",
                    status, text
                )));
            }
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let candidate = data
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| LLMError::ParseError("No candidates in response".to_string()))?;

        let content_item = candidate
            .get("content")
            .ok_or_else(|| LLMError::ParseError("No content in candidate".to_string()))?;

        let parts = content_item
            .get("parts")
            .and_then(|p| p.as_array())
            .ok_or_else(|| LLMError::ParseError("No parts in candidate content".to_string()))?;

        let mut full_text = String::new();
        for part in parts {
            if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                full_text.push_str(text);
            }
        }

        Ok(full_text)
    }
}
