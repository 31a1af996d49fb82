use crate::email::templates::{self, InquiryView};
use crate::email::OutboundEmail;
use crate::variants::Variant;

use super::metadata::SubmissionMeta;
use super::model::Submission;
use super::validate::FieldSource;

/// Addresses an inquiry is sent from and delivered to.
pub struct Envelope<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

pub fn subject(variant: &Variant, submission: &Submission) -> String {
    let classifier = submission
        .field(&variant.classifier_field)
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let prefix = variant.subject_prefix(classifier);

    strip_control(&format!("{prefix} New inquiry from {}", submission.name()))
}

/// Build the notification for a validated submission. Replies go to the
/// submitter.
pub fn compose(
    variant: &Variant,
    submission: &Submission,
    meta: &SubmissionMeta,
    envelope: &Envelope<'_>,
) -> Result<OutboundEmail, askama::Error> {
    let inquiry_type = submission
        .field(&variant.classifier_field)
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let extras: Vec<(String, String)> = submission
        .extras
        .iter()
        .filter(|(key, _)| *key != &variant.classifier_field)
        .filter(|(key, _)| variant.honeypot_field.as_ref() != Some(*key))
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| (key.clone(), value.trim().to_string()))
        .collect();

    let view = InquiryView {
        site_name: &variant.site_name,
        inquiry_type,
        name: submission.name(),
        email: submission.email(),
        project_details: submission.project_details(),
        extras: &extras,
        received_at: meta.received_at.to_rfc3339(),
    };

    let html = if variant.html {
        Some(templates::render_inquiry_html(&view)?)
    } else {
        None
    };

    Ok(OutboundEmail {
        from: envelope.from.to_string(),
        to: envelope.to.to_string(),
        reply_to: submission.email().to_string(),
        subject: subject(variant, submission),
        text: templates::render_inquiry_text(&view),
        html,
    })
}

fn strip_control(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
