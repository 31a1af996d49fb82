pub mod send_email;

use axum::routing::any;
use axum::Router;

use crate::state::SharedState;

/// Both routes accept every method; the handler answers non-POST itself so
/// the 405 carries the JSON error body.
pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/send-email", any(send_email::send_email))
        .route(
            "/api/variants/{slug}/send-email",
            any(send_email::send_variant_email),
        )
}
