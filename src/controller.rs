//! Client side of the contact modal: holds field values, checks the variant's
//! required fields, posts once per submit and reports the outcome.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::submission::validate::{self, FieldSource};
use crate::variants::Variant;

pub const MSG_MISSING_FIELDS: &str = "Please fill in all required fields";
pub const MSG_SENT: &str = "Message sent successfully!";
pub const MSG_FAILED: &str = "Failed to send message. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Success(_))
    }
}

#[derive(Debug)]
pub enum SubmitError {
    Status(u16),
    Network(String),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Status(code) => write!(f, "Server responded with {code}"),
            SubmitError::Network(msg) => write!(f, "Network error: {msg}"),
        }
    }
}

/// Delivers the form values to the submission endpoint.
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    async fn submit(&self, fields: &BTreeMap<String, String>) -> Result<(), SubmitError>;
}

/// Posts the form as JSON. Any non-2xx status is a failure.
pub struct HttpSubmitter {
    client: reqwest::Client,
    url: String,
}

impl HttpSubmitter {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl SubmitTransport for HttpSubmitter {
    async fn submit(&self, fields: &BTreeMap<String, String>) -> Result<(), SubmitError> {
        let resp = self
            .client
            .post(&self.url)
            .json(fields)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SubmitError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}

struct FormFields<'a>(&'a BTreeMap<String, String>);

impl FieldSource for FormFields<'_> {
    fn field(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|s| s.as_str())
    }
}

pub struct ContactFormController<T> {
    transport: T,
    required_fields: Vec<String>,
    fields: BTreeMap<String, String>,
    submitting: bool,
    modal_open: bool,
    last_notification: Option<Notification>,
}

impl<T: SubmitTransport> ContactFormController<T> {
    pub fn new(required_fields: Vec<String>, transport: T) -> Self {
        Self {
            transport,
            required_fields,
            fields: BTreeMap::new(),
            submitting: false,
            modal_open: false,
            last_notification: None,
        }
    }

    pub fn for_variant(variant: &Variant, transport: T) -> Self {
        Self::new(variant.required_fields.clone(), transport)
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// True while a request is in flight; the submit control is disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.last_notification.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// One attempt per call: no retry, no queue.
    pub async fn submit(&mut self) -> Notification {
        let required = validate::CORE_FIELDS
            .iter()
            .copied()
            .chain(self.required_fields.iter().map(|s| s.as_str()));
        let missing = validate::missing_fields(&FormFields(&self.fields), required);
        if !missing.is_empty() {
            return self.notify(Notification::Error(MSG_MISSING_FIELDS.to_string()));
        }

        self.submitting = true;
        let result = self.transport.submit(&self.fields).await;
        self.submitting = false;

        match result {
            Ok(()) => {
                self.fields.values_mut().for_each(|v| v.clear());
                self.modal_open = false;
                self.notify(Notification::Success(MSG_SENT.to_string()))
            }
            Err(e) => {
                tracing::warn!("Contact form submission failed: {e}");
                self.notify(Notification::Error(MSG_FAILED.to_string()))
            }
        }
    }

    fn notify(&mut self, notification: Notification) -> Notification {
        self.last_notification = Some(notification.clone());
        notification
    }
}
