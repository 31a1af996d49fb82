use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailError, Mailer, OutboundEmail};
use crate::config::{SmtpConfig, TlsMode};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        Ok(Self {
            transport: build_smtp_transport(config)?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn provider(&self) -> &str {
        "smtp"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }
}

pub fn build_message(email: &OutboundEmail) -> Result<Message, MailError> {
    let builder = Message::builder()
        .from(parse_mailbox(&email.from, "from")?)
        .to(parse_mailbox(&email.to, "to")?)
        .reply_to(parse_mailbox(&email.reply_to, "reply-to")?)
        .subject(email.subject.clone());

    let message = match &email.html {
        Some(html) => builder.multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            html.clone(),
        )),
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.text.clone()),
    };

    message.map_err(|e| MailError::Build(e.to_string()))
}

fn parse_mailbox(raw: &str, role: &str) -> Result<Mailbox, MailError> {
    raw.parse()
        .map_err(|e| MailError::InvalidAddress(format!("{role}: {e}")))
}

pub fn build_smtp_transport(
    config: &SmtpConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, String> {
    let creds = Credentials::new(config.user.clone(), config.pass.clone());

    let transport = match config.tls_mode {
        TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| format!("SMTP relay error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build(),
        TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .credentials(creds)
            .build(),
        TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP starttls error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build(),
    };

    Ok(transport)
}
