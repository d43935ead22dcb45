use std::str::FromStr;

use anyhow::Context;

use crate::llm::{self, Provider};

/// Everything the server reads from the environment, resolved once at
/// startup. A malformed value aborts the boot instead of surfacing later
/// as a runtime surprise.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    pub provider: Provider,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_messages: usize,

    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub mistral_api_key: Option<String>,
    pub mistral_base_url: String,

    pub mailjet_api_key: Option<String>,
    pub mailjet_api_secret: Option<String>,
    pub contact_from: Option<String>,
    pub contact_to: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let provider = match var("LLM_PROVIDER") {
            Some(raw) => raw.parse::<Provider>()?,
            None => Provider::Mistral,
        };

        Ok(Self {
            database_url: var("DATABASE_URL").context("DATABASE_URL is required")?,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parsed("PORT", 8080)?,

            model: var("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_owned()),
            provider,
            temperature: parsed("LLM_TEMPERATURE", 0.7)?,
            max_tokens: parsed("LLM_MAX_TOKENS", 500)?,
            max_messages: parsed("CHAT_MESSAGE_LIMIT", 10)?,

            openai_api_key: var("OPENAI_API_KEY"),
            openai_base_url: var("OPENAI_API_BASE_URL")
                .unwrap_or_else(|| llm::openai::DEFAULT_BASE_URL.to_owned()),
            mistral_api_key: var("MISTRAL_API_KEY"),
            mistral_base_url: var("MISTRAL_API_BASE_URL")
                .unwrap_or_else(|| llm::mistral::DEFAULT_BASE_URL.to_owned()),

            mailjet_api_key: var("MAILJET_API_KEY"),
            mailjet_api_secret: var("MAILJET_API_SECRET"),
            contact_from: var("CONTACT_FROM_EMAIL"),
            contact_to: var("CONTACT_TO_EMAIL"),
        })
    }
}

fn var(name: &str) -> Option<String> {
    dotenv::var(name).ok().filter(|value| !value.is_empty())
}

fn parsed<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {name}: {raw}")),
        None => Ok(default),
    }
}
