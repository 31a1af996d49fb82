use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::validate::FieldSource;

/// One contact attempt. Lives for a single request and is never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub project_details: Option<String>,
    pub inquiry_type: Option<String>,
    /// Variant-specific fields (company size, timeline, store URL, ...).
    pub extras: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubmission {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    project_details: Option<String>,
    #[serde(default)]
    inquiry_type: Option<String>,
    #[serde(flatten)]
    extras: BTreeMap<String, Value>,
}

impl Submission {
    pub fn from_value(value: Value) -> Result<Self, String> {
        if !value.is_object() {
            return Err("Expected an object".to_string());
        }

        let raw: RawSubmission =
            serde_json::from_value(value).map_err(|e| format!("Invalid submission: {e}"))?;

        let mut extras: BTreeMap<String, String> = raw
            .extras
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect();

        // Some landing pages post the free-text body as `message`.
        let project_details = raw.project_details.or_else(|| extras.remove("message"));

        Ok(Submission {
            name: raw.name,
            email: raw.email,
            project_details,
            inquiry_type: raw.inquiry_type,
            extras,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default().trim()
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default().trim()
    }

    pub fn project_details(&self) -> &str {
        self.project_details.as_deref().unwrap_or_default().trim()
    }
}

impl FieldSource for Submission {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => self.name.as_deref(),
            "email" => self.email.as_deref(),
            "projectDetails" | "message" => self.project_details.as_deref(),
            "inquiryType" => self.inquiry_type.as_deref(),
            other => self.extras.get(other).map(|s| s.as_str()),
        }
    }
}
