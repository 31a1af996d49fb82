use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One landing-page campaign: which fields it requires and how its inquiries
/// are titled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    pub slug: String,
    pub site_name: String,
    pub required_fields: Vec<String>,
    #[serde(default = "default_classifier")]
    pub classifier_field: String,
    #[serde(default)]
    pub subject_prefixes: BTreeMap<String, String>,
    #[serde(default = "default_prefix")]
    pub default_prefix: String,
    #[serde(default)]
    pub honeypot_field: Option<String>,
    #[serde(default)]
    pub html: bool,
}

fn default_classifier() -> String {
    "inquiryType".to_string()
}

fn default_prefix() -> String {
    "[New Inquiry]".to_string()
}

impl Variant {
    /// Subject prefix for a classifier value, falling back to the default.
    pub fn subject_prefix(&self, classifier: Option<&str>) -> &str {
        classifier
            .and_then(|c| self.subject_prefixes.get(c))
            .map(|s| s.as_str())
            .unwrap_or(self.default_prefix.as_str())
    }
}

pub struct VariantRegistry {
    variants: HashMap<String, Variant>,
    default_slug: String,
}

impl VariantRegistry {
    pub fn new(variants: Vec<Variant>, default_slug: &str) -> Result<Self, String> {
        let mut map = HashMap::new();
        for variant in variants {
            if variant.slug.is_empty() {
                return Err("Variant slug must not be empty".to_string());
            }
            if map.insert(variant.slug.clone(), variant).is_some() {
                return Err("Duplicate variant slug".to_string());
            }
        }

        if !map.contains_key(default_slug) {
            return Err(format!("Default variant '{default_slug}' is not defined"));
        }

        Ok(Self {
            variants: map,
            default_slug: default_slug.to_string(),
        })
    }

    pub fn builtin(default_slug: &str) -> Result<Self, String> {
        Self::new(builtin_variants(), default_slug)
    }

    /// Load a JSON array of variants, replacing the built-in table.
    pub fn from_file(path: &Path, default_slug: &str) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read variants file {}: {e}", path.display()))?;
        let variants: Vec<Variant> = serde_json::from_str(&raw)
            .map_err(|e| format!("Invalid variants file {}: {e}", path.display()))?;
        Self::new(variants, default_slug)
    }

    pub fn get(&self, slug: &str) -> Option<&Variant> {
        self.variants.get(slug)
    }

    pub fn default_variant(&self) -> &Variant {
        // Presence checked in `new`.
        &self.variants[&self.default_slug]
    }

    pub fn list(&self) -> Vec<&Variant> {
        self.variants.values().collect()
    }
}

pub fn builtin_variants() -> Vec<Variant> {
    let fields = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let prefixes = |pairs: &[(&str, &str)]| {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>()
    };

    vec![
        Variant {
            slug: "protolaunch".to_string(),
            site_name: "ProtoLaunch Landing Page".to_string(),
            required_fields: fields(&["name", "email", "projectDetails", "inquiryType"]),
            classifier_field: default_classifier(),
            subject_prefixes: prefixes(&[
                ("Startup MVP", "[MVP Inquiry]"),
                ("Custom Build", "[Custom Build]"),
                ("General", "[General Inquiry]"),
            ]),
            default_prefix: default_prefix(),
            honeypot_field: None,
            html: false,
        },
        Variant {
            slug: "agency".to_string(),
            site_name: "Agency Landing Page".to_string(),
            required_fields: fields(&["name", "email", "projectDetails", "projectType"]),
            classifier_field: "projectType".to_string(),
            subject_prefixes: BTreeMap::new(),
            default_prefix: "[Web Project Inquiry]".to_string(),
            honeypot_field: None,
            html: true,
        },
        Variant {
            slug: "prototype".to_string(),
            site_name: "Prototype Landing Page".to_string(),
            required_fields: fields(&["name", "email", "projectDetails"]),
            classifier_field: "type".to_string(),
            subject_prefixes: prefixes(&[("contact", "[High-Fidelity Prototype Interest]")]),
            default_prefix: "[Free Low-Fidelity Prototype Request]".to_string(),
            honeypot_field: None,
            html: false,
        },
    ]
}
