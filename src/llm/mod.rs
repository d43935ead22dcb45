pub mod mistral;
pub mod openai;

pub use mistral::MistralApi;
pub use openai::OpenAiApi;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{AppResult, db::ChatMessage};

/// Reply used when a vendor returns a completion with no content.
pub(crate) const FALLBACK_REPLY: &str = "I apologize, I couldn't process that request.";

/// Role of a stored chat turn. The system turn never touches the database,
/// so it lives in [`TurnRole`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// Role on the vendor wire, a superset of [`ChatRole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

/// One entry of the message list sent to a chat-completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: String) -> Self {
        Self { role: TurnRole::System, content }
    }
}

impl From<&ChatMessage> for ChatTurn {
    fn from(message: &ChatMessage) -> Self {
        let role = match message.role {
            ChatRole::User => TurnRole::User,
            ChatRole::Assistant => TurnRole::Assistant,
        };
        Self { role, content: message.content.clone() }
    }
}

/// Which vendor backs the agent. Picked by explicit configuration and
/// checked at startup; an unknown value never makes it past `Config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Mistral,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Mistral => "mistral-small-latest",
        }
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "mistral" => Ok(Self::Mistral),
            other => anyhow::bail!("unsupported LLM provider `{other}` (expected `openai` or `mistral`)"),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Mistral => write!(f, "mistral"),
        }
    }
}

/// Uniform capability over the vendor chat-completion backends: an ordered
/// role/content list in, a single text completion out. No retry, no backoff;
/// failures surface to the route layer as a 500.
#[async_trait]
pub trait AiApi: Send + Sync {
    async fn get_response(&self, messages: &[ChatTurn]) -> AppResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("Mistral".parse::<Provider>().unwrap(), Provider::Mistral);
    }

    #[test]
    fn provider_rejects_unknown_names() {
        assert!("gpt-4o".parse::<Provider>().is_err());
        assert!("".parse::<Provider>().is_err());
    }

    #[test]
    fn roles_serialize_lowercase() {
        let turn = ChatTurn::system("hi".to_owned());
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "system");

        assert_eq!(serde_json::to_value(ChatRole::Assistant).unwrap(), "assistant");
    }

    #[test]
    fn role_names_are_closed() {
        assert_eq!(ChatRole::from_name("user"), Some(ChatRole::User));
        assert_eq!(ChatRole::from_name("assistant"), Some(ChatRole::Assistant));
        assert_eq!(ChatRole::from_name("system"), None);
        assert_eq!(ChatRole::from_name("User"), None);
    }
}
