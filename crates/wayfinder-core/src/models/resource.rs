//! Resource model definition.

use serde::{Deserialize, Serialize};

use super::{Language, Step};

/// A named tool or material mentioned by plan steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    /// Unique identifier for the resource
    pub id: String,

    /// Canonical display name, brackets stripped and trimmed
    pub name: String,

    /// Acquisition plan, absent until fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,

    /// Whether an acquisition request is in flight
    #[serde(default)]
    pub is_loading: bool,

    /// Language the entry (and its acquisition plan) belongs to
    pub language: Language,
}

impl Resource {
    /// Creates an idle resource with no acquisition plan.
    pub fn new(id: impl Into<String>, name: impl Into<String>, language: Language) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            steps: None,
            is_loading: false,
            language,
        }
    }

    /// Whether the acquisition plan can be shown in `language` as is.
    ///
    /// An empty acquisition plan counts as absent.
    pub fn has_steps_for(&self, language: Language) -> bool {
        self.language == language && self.steps.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Case-insensitive name comparison used for deduplication.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
