use std::net::IpAddr;

use axum::http::HeaderMap;
use bytes::Bytes;

use crate::error::AppError;
use crate::state::SharedState;

use super::compose::{self, Envelope};
use super::honeypot;
use super::metadata;
use super::model::Submission;
use super::parser;
use super::validate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The mailer accepted the message.
    Sent,
    /// Honeypot tripped; answered as success, nothing sent.
    Discarded,
}

/// Everything after the method gate, in order: config, variant, rate limit,
/// parse, validate, honeypot, compose, send. Each stage either passes or
/// short-circuits with the error that becomes the response.
pub async fn run(
    state: &SharedState,
    variant_slug: Option<&str>,
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    body: Bytes,
) -> Result<Outcome, AppError> {
    let (Some(mailer), Some(mail_config)) = (state.mailer.as_ref(), state.config.mail.as_ref())
    else {
        return Err(AppError::Configuration(
            "Email delivery is not configured".to_string(),
        ));
    };

    let variant = match variant_slug {
        Some(slug) => state
            .variants
            .get(slug)
            .ok_or_else(|| AppError::NotFound("Unknown form".to_string()))?,
        None => state.variants.default_variant(),
    };

    let meta = metadata::extract(headers, peer_addr, &state.config.trusted_proxies);

    state
        .submission_limiter
        .check(
            &variant.slug,
            meta.ip,
            state.config.rate_limit,
            state.config.rate_window_secs,
        )
        .map_err(|retry_after| {
            tracing::warn!(variant = %variant.slug, ip = %meta.ip, "Submission rate limited");
            AppError::RateLimited { retry_after }
        })?;

    let raw = parser::parse(headers, body).await.map_err(|e| {
        tracing::debug!(variant = %variant.slug, "Unparseable submission: {e}");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let submission = Submission::from_value(raw).map_err(|e| {
        tracing::debug!(variant = %variant.slug, "Malformed submission: {e}");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    if let Err(e) = validate::validate(&submission, &variant.required_fields) {
        tracing::info!(variant = %variant.slug, ip = %meta.ip, "Rejected submission: {e:?}");
        return Err(AppError::BadRequest(e.public_message().to_string()));
    }

    if honeypot::is_spam(&submission, variant.honeypot_field.as_deref()) {
        tracing::info!(variant = %variant.slug, ip = %meta.ip, "Honeypot filled, discarding");
        return Ok(Outcome::Discarded);
    }

    let envelope = Envelope {
        from: &mail_config.from,
        to: &mail_config.recipient,
    };
    let email = compose::compose(variant, &submission, &meta, &envelope)
        .map_err(|e| AppError::Internal(format!("Failed to render inquiry: {e}")))?;

    mailer.send(&email).await?;

    tracing::info!(
        variant = %variant.slug,
        provider = mailer.provider(),
        ip = %meta.ip,
        user_agent = %meta.user_agent,
        referer = %meta.referer,
        "Inquiry sent"
    );

    Ok(Outcome::Sent)
}
