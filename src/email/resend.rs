use async_trait::async_trait;
use serde::Serialize;

use super::{MailError, Mailer, OutboundEmail};
use crate::config::ResendConfig;

/// Transactional email over the Resend HTTP API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    reply_to: &'a str,
}

impl ResendMailer {
    pub fn new(config: &ResendConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/emails", config.api_base.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    fn provider(&self) -> &str {
        "resend"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let request = SendRequest {
            from: &email.from,
            to: [&email.to],
            subject: &email.subject,
            text: &email.text,
            html: email.html.as_deref(),
            reply_to: &email.reply_to,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
