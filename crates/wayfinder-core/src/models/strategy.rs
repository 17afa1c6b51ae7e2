//! Strategy model definition.

use serde::{Deserialize, Serialize};

use super::{Language, PlanItem};

/// One proposed high-level approach toward the user's goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Strategy {
    /// Unique identifier for the strategy
    pub id: String,

    /// Short title
    pub title: String,

    /// One or two sentences describing the approach
    pub description: String,

    /// Execution plan, empty until the strategy is first selected
    #[serde(default)]
    pub plan: Vec<PlanItem>,

    /// Language the plan was generated in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_language: Option<Language>,
}

impl Strategy {
    /// Creates a strategy with no plan yet.
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            plan: Vec::new(),
            plan_language: None,
        }
    }

    /// Whether the cached plan can be shown in `language` without
    /// regenerating it.
    pub fn has_plan_for(&self, language: Language) -> bool {
        !self.plan.is_empty() && self.plan_language == Some(language)
    }
}
