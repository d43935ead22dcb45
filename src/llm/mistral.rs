use async_trait::async_trait;
use serde_json::{Value, json};

use super::{AiApi, ChatTurn, FALLBACK_REPLY};
use crate::{AppResult, error::AppError};

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Mistral chat-completion backend. La Plateforme speaks the same
/// `/chat/completions` request shape as OpenAI, so only auth target and
/// error labels differ.
pub struct MistralApi {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl MistralApi {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
            temperature,
            max_tokens,
        }
    }
}

#[async_trait]
impl AiApi for MistralApi {
    async fn get_response(&self, messages: &[ChatTurn]) -> AppResult<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": messages,
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
            }))
            .send()
            .await
            .map_err(|err| AppError::Model(format!("Mistral request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Model(format!("Mistral returned {status}: {body}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| AppError::Model(format!("Mistral response parse failed: {err}")))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .unwrap_or(FALLBACK_REPLY);
        Ok(content.to_owned())
    }
}
