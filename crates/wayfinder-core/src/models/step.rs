//! Step model definition and related functionality.

use serde::{Deserialize, Serialize};

/// A single instruction in a plan, optionally decomposed into sub-steps.
///
/// Sub-steps nest to arbitrary depth. Once `sub_steps` is populated it is
/// never regenerated; expanding again only flips `is_expanded`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Unique identifier for the step
    pub id: String,

    /// Instruction text, may embed `[bracketed]` resource mentions
    pub instruction: String,

    /// Resource names mentioned by this step, in mention order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,

    /// Child steps produced by expansion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_steps: Option<Vec<Step>>,

    /// Whether the sub-steps are currently shown
    #[serde(default)]
    pub is_expanded: bool,

    /// Whether an expansion request is in flight
    #[serde(default)]
    pub is_loading: bool,
}

impl Step {
    /// Creates a collapsed, idle step.
    pub fn new(id: impl Into<String>, instruction: impl Into<String>, resources: Vec<String>) -> Self {
        Self {
            id: id.into(),
            instruction: instruction.into(),
            resources,
            sub_steps: None,
            is_expanded: false,
            is_loading: false,
        }
    }

    /// True once an expansion has produced at least one sub-step.
    pub fn has_sub_steps(&self) -> bool {
        self.sub_steps.as_ref().is_some_and(|s| !s.is_empty())
    }
}
