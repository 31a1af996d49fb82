#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use contact_relay::config::{Config, MailConfig, MailProvider, ResendConfig};
use contact_relay::email::{MailError, Mailer, OutboundEmail};
use contact_relay::state::SharedState;
use contact_relay::variants::{Variant, VariantRegistry};

pub const RECIPIENT: &str = "leads@agency.test";
pub const SENDER: &str = "Contact Relay <relay@agency.test>";

/// Records every message instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    fn provider(&self) -> &str {
        "recording"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Always fails, the way an unreachable relay would.
#[derive(Default)]
pub struct FailingMailer {
    pub attempts: Mutex<u32>,
}

#[async_trait]
impl Mailer for FailingMailer {
    fn provider(&self) -> &str {
        "failing"
    }

    async fn send(&self, _email: &OutboundEmail) -> Result<(), MailError> {
        *self.attempts.lock().unwrap() += 1;
        Err(MailError::Transport(
            "connection refused by smtp.internal.test:587".to_string(),
        ))
    }
}

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit JSON to a path, return (body, status).
    pub async fn post_json(&self, path: &str, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(data)
            .send()
            .await
            .expect("post json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit to the default variant.
    pub async fn submit(&self, data: &Value) -> (Value, StatusCode) {
        self.post_json("/api/send-email", data).await
    }

    /// Submit form-urlencoded data, return (body, status).
    pub async fn submit_form(&self, path: &str, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 65_536,
        trusted_proxies: vec![],
        cors_origins: vec![],
        rate_limit: 100,
        rate_window_secs: 60,
        variants_file: None,
        default_variant: "protolaunch".to_string(),
        log_level: "warn".to_string(),
        mail: Some(MailConfig {
            recipient: RECIPIENT.to_string(),
            from: SENDER.to_string(),
            provider: MailProvider::Resend(ResendConfig {
                api_key: "re_test".to_string(),
                api_base: "http://127.0.0.1:9".to_string(),
            }),
        }),
    }
}

/// Built-in variants plus one with a honeypot, for spam tests.
pub fn test_variants() -> VariantRegistry {
    let mut variants = contact_relay::variants::builtin_variants();
    variants.push(Variant {
        slug: "guarded".to_string(),
        site_name: "Guarded Page".to_string(),
        required_fields: vec!["name".to_string(), "email".to_string(), "projectDetails".to_string()],
        classifier_field: "inquiryType".to_string(),
        subject_prefixes: Default::default(),
        default_prefix: "[New Inquiry]".to_string(),
        honeypot_field: Some("website".to_string()),
        html: false,
    });
    VariantRegistry::new(variants, "protolaunch").unwrap()
}

pub async fn spawn_app_with(config: Config, mailer: Option<Arc<dyn Mailer>>) -> TestApp {
    let (app, state) = contact_relay::build_app(config, test_variants(), mailer);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        state,
    }
}

/// Spawn an app whose mailer records messages.
pub async fn spawn_app() -> (TestApp, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app_with(test_config(), Some(mailer.clone())).await;
    (app, mailer)
}

pub fn alice() -> Value {
    json!({
        "name": "Alice",
        "email": "alice@example.com",
        "projectDetails": "Need a site",
        "inquiryType": "General"
    })
}
