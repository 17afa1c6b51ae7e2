//! The user's goal as entered on the input screen.

use serde::{Deserialize, Serialize};

use crate::params::GenerateStrategies;

/// Goal text plus optional quantification and environment context.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goal {
    pub description: String,
    #[serde(default)]
    pub quantification: String,
    #[serde(default)]
    pub environment: String,
}

impl Goal {
    /// True when no field carries any text.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.quantification.is_empty() && self.environment.is_empty()
    }
}

impl From<GenerateStrategies> for Goal {
    fn from(params: GenerateStrategies) -> Self {
        Goal {
            description: params.description.trim().to_string(),
            quantification: params.quantification.unwrap_or_default().trim().to_string(),
            environment: params.environment.unwrap_or_default().trim().to_string(),
        }
    }
}
