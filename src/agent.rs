use anyhow::bail;

use crate::{
    AppResult,
    config::Config,
    llm::{AiApi, ChatTurn, MistralApi, OpenAiApi, Provider},
    portfolio::Portfolio,
    prompt,
};

/// Role-plays as the site owner. The system turn is built once at startup
/// from the portfolio document and prepended to every delegated history;
/// there is no per-request customization.
pub struct TwinAgent {
    system: ChatTurn,
    api: Box<dyn AiApi>,
}

impl TwinAgent {
    /// Fails fast when the selected provider has no API key configured.
    pub fn new(config: &Config, portfolio: &Portfolio) -> anyhow::Result<Self> {
        let api: Box<dyn AiApi> = match config.provider {
            Provider::OpenAi => {
                let Some(api_key) = config.openai_api_key.clone() else {
                    bail!("OPENAI_API_KEY is required when LLM_PROVIDER=openai");
                };
                Box::new(OpenAiApi::new(
                    api_key,
                    config.openai_base_url.clone(),
                    config.model.clone(),
                    config.temperature,
                    config.max_tokens,
                ))
            }
            Provider::Mistral => {
                let Some(api_key) = config.mistral_api_key.clone() else {
                    bail!("MISTRAL_API_KEY is required when LLM_PROVIDER=mistral");
                };
                Box::new(MistralApi::new(
                    api_key,
                    config.mistral_base_url.clone(),
                    config.model.clone(),
                    config.temperature,
                    config.max_tokens,
                ))
            }
        };

        Ok(Self::with_api(prompt::system_prompt(portfolio), api))
    }

    /// Builds an agent around an arbitrary backend; tests use this to swap
    /// in a canned one.
    pub fn with_api(system_message: String, api: Box<dyn AiApi>) -> Self {
        Self {
            system: ChatTurn::system(system_message),
            api,
        }
    }

    pub async fn get_response(&self, history: &[ChatTurn]) -> AppResult<String> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(self.system.clone());
        messages.extend_from_slice(history);
        self.api.get_response(&messages).await
    }
}
