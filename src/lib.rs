pub mod config;
pub mod controller;
pub mod email;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod submission;
pub mod variants;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::Mailer;
use crate::error::AppError;
use crate::rate_limit::SubmissionRateLimiter;
use crate::state::{AppState, SharedState};
use crate::variants::VariantRegistry;

/// Assemble the router. The mailer is built by the caller once at startup and
/// injected here; `None` leaves the send endpoints answering with a
/// configuration error.
pub fn build_app(
    config: Config,
    variants: VariantRegistry,
    mailer: Option<Arc<dyn Mailer>>,
) -> (Router, SharedState) {
    match &mailer {
        Some(m) => tracing::info!(provider = m.provider(), "Email delivery configured"),
        None => tracing::error!("Email delivery not configured; submissions will fail"),
    }

    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        config,
        variants,
        mailer,
        submission_limiter: SubmissionRateLimiter::new(),
    });

    let app = Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body_size)),
        )
        .layer(axum::middleware::map_response(json_payload_too_large))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state.clone());

    (app, state)
}

/// The body limit answers in plain text; keep the JSON error shape.
async fn json_payload_too_large(response: Response) -> Response {
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge.into_response();
    }
    response
}

async fn health() -> &'static str {
    "ok"
}
