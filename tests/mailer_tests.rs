mod common;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use contact_relay::config::{MailConfig, MailProvider, ResendConfig};
use contact_relay::email::{MailError, Mailer, OutboundEmail, ResendMailer};

/// Stand-in for the Resend API: records each call and answers with `status`.
struct StubApi {
    status: StatusCode,
    calls: Mutex<Vec<(Option<String>, Value)>>,
}

impl StubApi {
    fn calls(&self) -> Vec<(Option<String>, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

async fn stub_emails(
    State(stub): State<Arc<StubApi>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.calls.lock().unwrap().push((auth, body));

    if stub.status.is_success() {
        (stub.status, Json(json!({ "id": "email_123" })))
    } else {
        (
            stub.status,
            Json(json!({ "name": "validation_error", "message": "Invalid `from` field" })),
        )
    }
}

async fn spawn_stub(status: StatusCode) -> (String, Arc<StubApi>) {
    let stub = Arc::new(StubApi {
        status,
        calls: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/emails", post(stub_emails))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server failed");
    });

    (format!("http://{addr}/"), stub)
}

fn resend_config(api_base: &str) -> ResendConfig {
    ResendConfig {
        api_key: "re_test_key".to_string(),
        api_base: api_base.to_string(),
    }
}

fn outbound() -> OutboundEmail {
    OutboundEmail {
        from: common::SENDER.to_string(),
        to: common::RECIPIENT.to_string(),
        reply_to: "alice@example.com".to_string(),
        subject: "[General Inquiry] New inquiry from Alice".to_string(),
        text: "Name: Alice".to_string(),
        html: None,
    }
}

#[tokio::test]
async fn resend_posts_json_with_bearer_token() {
    let (base, stub) = spawn_stub(StatusCode::OK).await;
    let mailer = ResendMailer::new(&resend_config(&base)).unwrap();

    mailer.send(&outbound()).await.unwrap();

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    let (auth, body) = &calls[0];
    assert_eq!(auth.as_deref(), Some("Bearer re_test_key"));
    assert_eq!(body["from"], json!(common::SENDER));
    assert_eq!(body["to"], json!([common::RECIPIENT]));
    assert_eq!(body["reply_to"], json!("alice@example.com"));
    assert_eq!(body["subject"], json!("[General Inquiry] New inquiry from Alice"));
    assert_eq!(body["text"], json!("Name: Alice"));
    assert!(body.get("html").is_none());
}

#[tokio::test]
async fn resend_includes_html_when_present() {
    let (base, stub) = spawn_stub(StatusCode::OK).await;
    let mailer = ResendMailer::new(&resend_config(&base)).unwrap();

    let mut email = outbound();
    email.html = Some("<p>Name: Alice</p>".to_string());
    mailer.send(&email).await.unwrap();

    assert_eq!(stub.calls()[0].1["html"], json!("<p>Name: Alice</p>"));
}

#[tokio::test]
async fn resend_non_success_status_is_rejected() {
    let (base, stub) = spawn_stub(StatusCode::UNPROCESSABLE_ENTITY).await;
    let mailer = ResendMailer::new(&resend_config(&base)).unwrap();

    let err = mailer.send(&outbound()).await.unwrap_err();
    match err {
        MailError::Rejected { status, body } => {
            assert_eq!(status, 422);
            assert!(body.contains("validation_error"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(stub.calls().len(), 1);
}

#[tokio::test]
async fn resend_unreachable_is_transport_error() {
    // Nothing listens on the discard port.
    let mailer = ResendMailer::new(&resend_config("http://127.0.0.1:9")).unwrap();

    let err = mailer.send(&outbound()).await.unwrap_err();
    assert!(matches!(err, MailError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn provider_rejection_surfaces_as_generic_500() {
    let (base, stub) = spawn_stub(StatusCode::UNPROCESSABLE_ENTITY).await;

    let mut config = common::test_config();
    config.mail = Some(MailConfig {
        recipient: common::RECIPIENT.to_string(),
        from: common::SENDER.to_string(),
        provider: MailProvider::Resend(resend_config(&base)),
    });
    let mailer = contact_relay::email::build_mailer(config.mail.as_ref().unwrap()).unwrap();
    assert_eq!(mailer.provider(), "resend");
    let app = common::spawn_app_with(config, Some(mailer)).await;

    let (body, status) = app.submit(&common::alice()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": "Failed to send email" }));
    assert!(!body.to_string().contains("validation_error"));

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1["reply_to"], json!("alice@example.com"));
}
