//! Events fed into the reducer and the effects it asks the driver to run.

use crate::{
    models::{Goal, Language, PlanItem, Step, Strategy},
    prompts::GenerationRequest,
};

/// Everything that can happen to the application state.
///
/// Completion events carry the `generation` of the effect they answer;
/// completions from a superseded generation are discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Goal text edited on the input screen
    SetGoal(Goal),
    /// Active output language changed
    SetLanguage(Language),
    /// Ask for strategies for the current goal
    Generate,
    StrategiesLoaded {
        generation: u64,
        strategies: Vec<Strategy>,
    },
    StrategiesFailed {
        generation: u64,
        message: String,
    },
    /// Open a strategy's plan, generating it if missing or stale
    SelectStrategy { strategy_id: String },
    PlanLoaded {
        generation: u64,
        strategy_id: String,
        plan: Vec<PlanItem>,
        language: Language,
    },
    PlanFailed {
        generation: u64,
        strategy_id: String,
        message: String,
    },
    /// Expand a step, or flip visibility if its sub-steps already exist
    ToggleStep { step_id: String },
    SubStepsLoaded {
        generation: u64,
        step_id: String,
        sub_steps: Vec<Step>,
        language: Language,
    },
    ExpansionFailed {
        generation: u64,
        step_id: String,
        message: String,
    },
    /// Open a resource by display name
    OpenResource { name: String },
    CloseResource,
    ResourceLoaded {
        generation: u64,
        resource_id: String,
        steps: Vec<Step>,
        language: Language,
    },
    ResourceFailed {
        generation: u64,
        resource_id: String,
        message: String,
    },
    /// Leave the detail screen
    Back,
    /// Discard everything and return to the input screen
    Reset,
}

/// What a completed effect should be written back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectTarget {
    Strategies,
    Plan { strategy_id: String },
    SubSteps { step_id: String },
    Resource { resource_id: String },
}

/// A model call requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    /// Generation the request was issued under
    pub generation: u64,
    pub target: EffectTarget,
    pub request: GenerationRequest,
}

impl Effect {
    /// Build the failure event answering this effect.
    pub fn failed(&self, message: impl Into<String>) -> Event {
        let generation = self.generation;
        let message = message.into();
        match &self.target {
            EffectTarget::Strategies => Event::StrategiesFailed { generation, message },
            EffectTarget::Plan { strategy_id } => Event::PlanFailed {
                generation,
                strategy_id: strategy_id.clone(),
                message,
            },
            EffectTarget::SubSteps { step_id } => Event::ExpansionFailed {
                generation,
                step_id: step_id.clone(),
                message,
            },
            EffectTarget::Resource { resource_id } => Event::ResourceFailed {
                generation,
                resource_id: resource_id.clone(),
                message,
            },
        }
    }
}

/// Result of applying one event.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: super::AppState,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub(crate) fn idle(state: super::AppState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    pub(crate) fn with_effect(state: super::AppState, effect: Effect) -> Self {
        Self {
            state,
            effects: vec![effect],
        }
    }
}
