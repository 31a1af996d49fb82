use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::pipeline::{self, Outcome};

/// `/api/send-email`: the default variant.
pub async fn send_email(
    State(state): State<SharedState>,
    method: Method,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle(&state, None, method, addr, &headers, body).await
}

/// `/api/variants/{slug}/send-email`
pub async fn send_variant_email(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    method: Method,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle(&state, Some(&slug), method, addr, &headers, body).await
}

async fn handle(
    state: &SharedState,
    variant: Option<&str>,
    method: Method,
    addr: SocketAddr,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let origin = allowed_origin(state, headers);

    let mut response = if method == Method::OPTIONS {
        preflight()
    } else if method != Method::POST {
        AppError::MethodNotAllowed.into_response()
    } else {
        match pipeline::run(state, variant, headers, Some(addr.ip()), body).await {
            Ok(Outcome::Sent) | Ok(Outcome::Discarded) => {
                (StatusCode::OK, Json(json!({ "success": true }))).into_response()
            }
            Err(e) => e.into_response(),
        }
    };

    if let Some(origin) = origin {
        response
            .headers_mut()
            .insert("access-control-allow-origin", origin);
    }
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        response
            .headers_mut()
            .insert("allow", HeaderValue::from_static("POST, OPTIONS"));
    }

    response
}

fn preflight() -> Response {
    (
        [
            ("access-control-allow-methods", "POST, OPTIONS"),
            ("access-control-allow-headers", "Content-Type"),
            ("access-control-max-age", "86400"),
        ],
        StatusCode::NO_CONTENT,
    )
        .into_response()
}

/// Origin to echo back: `*` when no list is configured, otherwise the request
/// origin if it is on the list.
fn allowed_origin(state: &SharedState, headers: &HeaderMap) -> Option<HeaderValue> {
    let allowed = &state.config.cors_origins;
    if allowed.is_empty() {
        return Some(HeaderValue::from_static("*"));
    }

    let origin = headers.get("origin")?;
    let origin_str = origin.to_str().ok()?;
    allowed
        .iter()
        .any(|a| a == origin_str)
        .then(|| origin.clone())
}
