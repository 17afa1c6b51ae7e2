//! Parameter structures for assistant operations
//!
//! This module contains shared parameter structures used across the
//! interfaces (CLI, interactive session, MCP) without framework-specific
//! derives. Interface layers wrap or convert into these types.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! JSON schemas for the MCP layer are derived only when the `schema` feature
//! is enabled.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AssistantError, Result},
    models::Language,
};

/// Parameters for generating strategies toward a goal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GenerateStrategies {
    /// What the user wants to achieve
    pub description: String,
    /// How much or how far, e.g. "two loaves a week"
    #[serde(default)]
    pub quantification: Option<String>,
    /// Constraints of the user's situation, e.g. "small apartment oven"
    #[serde(default)]
    pub environment: Option<String>,
}

impl GenerateStrategies {
    /// Rejects an empty or whitespace-only goal before any model call.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wayfinder_core::params::GenerateStrategies;
    ///
    /// let params = GenerateStrategies {
    ///     description: "   ".to_string(),
    ///     ..Default::default()
    /// };
    /// assert!(params.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(AssistantError::invalid_input("description")
                .with_reason("Goal description must not be empty"));
        }
        Ok(())
    }
}

/// Parameters for selecting a strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SelectStrategy {
    /// Strategy ID, or its 1-based position in the strategy list
    pub strategy: String,
}

/// Parameters for expanding (or collapsing) a step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ExpandStep {
    /// ID of the step, at any depth of the open plan
    pub step_id: String,
}

/// Parameters for opening a resource's acquisition plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct OpenResource {
    /// Resource name as mentioned in a step; brackets and case are ignored
    pub name: String,
}

/// Parameters for switching the output language.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetLanguage {
    /// Language code or name: "en"/"english" or "zh"/"chinese"
    pub language: String,
}

impl SetLanguage {
    /// Parse the requested language.
    pub fn validate(&self) -> Result<Language> {
        self.language
            .parse()
            .map_err(|reason: String| AssistantError::invalid_input("language").with_reason(reason))
    }
}
