//! Patch types for identity-keyed updates.

use super::{Language, Resource, Step};

/// Partial update for a step; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepPatch {
    pub instruction: Option<String>,
    pub resources: Option<Vec<String>>,
    pub sub_steps: Option<Vec<Step>>,
    pub is_expanded: Option<bool>,
    pub is_loading: Option<bool>,
}

impl StepPatch {
    /// Patch that only sets the loading flag.
    pub fn loading(is_loading: bool) -> Self {
        Self {
            is_loading: Some(is_loading),
            ..Self::default()
        }
    }

    /// Patch that only sets the expansion flag.
    pub fn expanded(is_expanded: bool) -> Self {
        Self {
            is_expanded: Some(is_expanded),
            ..Self::default()
        }
    }

    /// Patch applied when an expansion completes: sub-steps land, the step
    /// opens and stops loading.
    pub fn expansion_loaded(sub_steps: Vec<Step>) -> Self {
        Self {
            sub_steps: Some(sub_steps),
            is_expanded: Some(true),
            is_loading: Some(false),
            ..Self::default()
        }
    }

    /// Shallow-merge this patch into `step`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wayfinder_core::models::{Step, StepPatch};
    ///
    /// let step = Step::new("s1", "Mix the [flour]", vec!["flour".to_string()]);
    /// let loading = StepPatch::loading(true).apply(&step);
    ///
    /// assert!(loading.is_loading);
    /// assert_eq!(loading.instruction, step.instruction);
    /// ```
    pub fn apply(&self, step: &Step) -> Step {
        Step {
            id: step.id.clone(),
            instruction: self
                .instruction
                .clone()
                .unwrap_or_else(|| step.instruction.clone()),
            resources: self
                .resources
                .clone()
                .unwrap_or_else(|| step.resources.clone()),
            sub_steps: self.sub_steps.clone().or_else(|| step.sub_steps.clone()),
            is_expanded: self.is_expanded.unwrap_or(step.is_expanded),
            is_loading: self.is_loading.unwrap_or(step.is_loading),
        }
    }
}

/// Partial update for a resource; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePatch {
    pub steps: Option<Vec<Step>>,
    pub is_loading: Option<bool>,
    pub language: Option<Language>,
}

impl ResourcePatch {
    /// Patch applied when an acquisition plan arrives.
    pub fn loaded(steps: Vec<Step>, language: Language) -> Self {
        Self {
            steps: Some(steps),
            is_loading: Some(false),
            language: Some(language),
        }
    }

    /// Patch that only sets the loading flag.
    pub fn loading(is_loading: bool) -> Self {
        Self {
            is_loading: Some(is_loading),
            ..Self::default()
        }
    }

    /// Shallow-merge this patch into `resource`.
    pub fn apply(&self, resource: &Resource) -> Resource {
        Resource {
            id: resource.id.clone(),
            name: resource.name.clone(),
            steps: self.steps.clone().or_else(|| resource.steps.clone()),
            is_loading: self.is_loading.unwrap_or(resource.is_loading),
            language: self.language.unwrap_or(resource.language),
        }
    }
}
