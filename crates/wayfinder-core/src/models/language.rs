//! Output language enumeration.

use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Type-safe enumeration of the languages content can be generated in.
///
/// Every cached piece of generated content (plans, acquisition steps) is
/// tagged with one of these; a tag that differs from the active language
/// marks the cache stale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Primary language
    #[default]
    #[serde(alias = "en")]
    English,

    /// Secondary language
    #[serde(alias = "zh")]
    Chinese,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "zh" | "chinese" | "zh-cn" => Ok(Language::Chinese),
            _ => Err(format!("Invalid language: {s}")),
        }
    }
}

impl Language {
    /// Short language code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
        }
    }

    /// Name used when pinning the model's output language.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Chinese => "Simplified Chinese",
        }
    }

    /// Placeholder used when the model omits a step's instruction.
    pub fn missing_instruction(&self) -> &'static str {
        match self {
            Language::English => "Instruction unavailable",
            Language::Chinese => "暂无说明",
        }
    }
}
