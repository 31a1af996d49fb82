use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Fields every submission must carry, whatever the variant says.
pub const CORE_FIELDS: [&str; 3] = ["name", "email", "projectDetails"];

/// Anything that can be looked up by form-field name.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingFields(Vec<String>),
    InvalidEmail,
}

impl ValidationError {
    /// Caller-facing message. Never includes submitted content.
    pub fn public_message(&self) -> &'static str {
        match self {
            ValidationError::MissingFields(_) => "Missing required fields",
            ValidationError::InvalidEmail => "Invalid email format",
        }
    }
}

/// Conventional `user@domain.tld` shape that is also usable as a reply-to
/// mailbox.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    EMAIL_RE.is_match(email) && email.parse::<lettre::Address>().is_ok()
}

/// Names of required fields that are absent or blank.
pub fn missing_fields<'a, S, I>(source: &S, required: I) -> Vec<String>
where
    S: FieldSource + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    let mut missing: Vec<String> = Vec::new();
    for name in required {
        let present = source
            .field(name)
            .is_some_and(|value| !value.trim().is_empty());
        if !present && !missing.iter().any(|m| m == name) {
            missing.push(name.to_string());
        }
    }
    missing
}

/// Server-side check: core fields plus the variant's own set, then email shape.
pub fn validate<S>(source: &S, required: &[String]) -> Result<(), ValidationError>
where
    S: FieldSource + ?Sized,
{
    let required = CORE_FIELDS
        .iter()
        .copied()
        .chain(required.iter().map(|s| s.as_str()));

    let missing = missing_fields(source, required);
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let email = source.field("email").unwrap_or_default();
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}
