use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Lowercase-and-trim an email for use in document keys.
///
/// Every cell and judge key in the store uses the normalized form; raw
/// emails from the auth layer must pass through here before any lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A judge registered for one competition.
///
/// Identified by lowercased email. The submission flag is per
/// (judge, category); a missing entry means not submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judge {
    pub email: String,
    pub competition_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub submitted_categories: HashMap<String, bool>,
}

impl Judge {
    pub fn new(
        email: impl AsRef<str>,
        competition_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: normalize_email(email.as_ref()),
            competition_id: competition_id.into(),
            name: name.into(),
            submitted_categories: HashMap::new(),
        }
    }

    pub fn has_submitted(&self, category_id: &str) -> bool {
        self.submitted_categories
            .get(category_id)
            .copied()
            .unwrap_or(false)
    }

    pub fn set_submitted(&mut self, category_id: &str, submitted: bool) {
        self.submitted_categories
            .insert(category_id.to_string(), submitted);
    }
}
