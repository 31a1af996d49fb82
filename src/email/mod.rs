pub mod resend;
pub mod smtp;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{MailConfig, MailProvider};

pub use resend::ResendMailer;
pub use smtp::SmtpMailer;

/// A fully composed message, ready for whichever provider is configured.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

#[derive(Debug)]
pub enum MailError {
    InvalidAddress(String),
    Build(String),
    Transport(String),
    Rejected { status: u16, body: String },
}

impl std::fmt::Display for MailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MailError::InvalidAddress(msg) => write!(f, "Invalid address: {msg}"),
            MailError::Build(msg) => write!(f, "Failed to build email: {msg}"),
            MailError::Transport(msg) => write!(f, "Failed to send email: {msg}"),
            MailError::Rejected { status, body } => {
                write!(f, "Provider rejected email ({status}): {body}")
            }
        }
    }
}

impl std::error::Error for MailError {}

/// The email-sending capability. Implementations are built once at startup
/// and shared by every request.
#[async_trait]
pub trait Mailer: Send + Sync {
    fn provider(&self) -> &str;
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}

/// Build the mailer for the configured provider.
pub fn build_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>, String> {
    let mailer: Arc<dyn Mailer> = match &config.provider {
        MailProvider::Smtp(smtp) => Arc::new(SmtpMailer::new(smtp)?),
        MailProvider::Resend(resend) => Arc::new(ResendMailer::new(resend)?),
    };
    Ok(mailer)
}
