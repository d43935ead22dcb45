use anyhow::Context;
use serde_json::Value;

use crate::include_res;

/// Biographical document backing the AI clone: skills, experience,
/// education, services, FAQ, testimonials. Loaded once at startup and
/// immutable afterwards; the prompt builder serializes the whole document
/// into the system message, so no field here needs to be typed beyond what
/// the server itself reads.
#[derive(Debug, Clone)]
pub struct Portfolio {
    data: Value,
}

impl Portfolio {
    /// The document shipped with the binary under `res/portfolio.json`.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_json(include_res!(str, "/portfolio.json"))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let data: Value =
            serde_json::from_str(raw).context("portfolio document is not valid JSON")?;
        data.get("personal")
            .and_then(|personal| personal.get("name"))
            .and_then(Value::as_str)
            .context("portfolio document is missing personal.name")?;
        Ok(Self { data })
    }

    pub fn owner_name(&self) -> &str {
        // presence checked in from_json
        self.data["personal"]["name"].as_str().unwrap_or_default()
    }

    pub fn as_value(&self) -> &Value {
        &self.data
    }
}
