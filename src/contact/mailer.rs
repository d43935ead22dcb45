use serde_json::json;
use tracing::info;

use crate::{AppResult, config::Config, error::AppError};

const SEND_URL: &str = "https://api.mailjet.com/v3.1/send";

/// Forwards contact-form submissions as transactional email through
/// Mailjet. Optional: without credentials the contact route only persists.
pub struct Mailer {
    client: reqwest::Client,
    api_key: String,
    api_secret: String,
    from: String,
    to: String,
}

impl Mailer {
    /// `None` unless key, secret and both addresses are all configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        Some(Self {
            client: reqwest::Client::new(),
            api_key: config.mailjet_api_key.clone()?,
            api_secret: config.mailjet_api_secret.clone()?,
            from: config.contact_from.clone()?,
            to: config.contact_to.clone()?,
        })
    }

    pub async fn notify_contact(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        message: &str,
    ) -> AppResult<()> {
        let body = format!(
            "Name: {}\nEmail: {}\n\n{message}",
            name.unwrap_or("(not given)"),
            email.unwrap_or("(not given)"),
        );

        let response = self
            .client
            .post(SEND_URL)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&json!({
                "Messages": [{
                    "From": { "Email": self.from },
                    "To": [{ "Email": self.to }],
                    "Subject": "New contact form submission",
                    "TextPart": body,
                }]
            }))
            .send()
            .await
            .map_err(|err| AppError::Mail(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Mail(format!("Mailjet returned {status}: {text}")));
        }

        info!("contact notification sent to {}", self.to);
        Ok(())
    }
}
