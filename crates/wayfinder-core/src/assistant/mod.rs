//! The async driver around the state machine.
//!
//! [`Assistant`] owns the [`AppState`] and a [`ModelClient`]. Each public
//! method turns a user action into an [`Event`], applies it, and runs the
//! [`Effect`](crate::state::Effect)s the reducer asks for: the request goes
//! to the client, the raw answer goes through the normalizer, and the typed
//! result comes back in as a completion event. Methods return once every
//! effect they caused has completed.
//!
//! The `begin_*` methods and [`Assistant::complete`] expose the same flow
//! in phases. `begin_*` applies the action and returns the
//! [`PendingCall`]s it caused; each call is sent without touching the
//! assistant, and its [`Completion`] is handed back to `complete`. A caller
//! sharing one assistant behind a lock holds the lock only while applying,
//! so the session can be read (it shows `View::Processing`) while a
//! generation is in flight, and expansions of different steps proceed side
//! by side.
//!
//! # Usage
//!
//! ```rust,no_run
//! use wayfinder_core::{params::GenerateStrategies, AssistantBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut assistant = AssistantBuilder::new().build()?;
//!
//! let params = GenerateStrategies {
//!     description: "Learn to bake bread".to_string(),
//!     ..Default::default()
//! };
//! assistant.generate_strategies(&params).await?;
//! assistant.select_strategy("1").await?;
//!
//! if let Some(strategy) = assistant.state().selected_strategy() {
//!     println!("{strategy}");
//! }
//! # Ok(())
//! # }
//! ```

use std::{collections::VecDeque, sync::Arc};

use log::{error, info, warn};

use crate::{
    client::ModelClient,
    error::{AssistantError, Result},
    models::{Goal, Language},
    normalize::{self, IdMinter},
    params::GenerateStrategies,
    state::{AppState, EffectTarget, Event, Transition},
};

mod builder;
mod call;

#[cfg(test)]
mod tests;

pub use builder::AssistantBuilder;
pub use call::{Completion, PendingCall};

/// An interactive planning session.
pub struct Assistant {
    client: Arc<dyn ModelClient>,
    state: AppState,
    /// Identities for normalized strategies, steps and groups
    ids: IdMinter,
}

impl Assistant {
    pub(crate) fn new(client: Arc<dyn ModelClient>, state: AppState, ids: IdMinter) -> Self {
        Self { client, state, ids }
    }

    /// Creates a builder for configuring a session.
    pub fn builder() -> AssistantBuilder {
        AssistantBuilder::new()
    }

    /// The current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Replace the goal text without generating.
    pub async fn set_goal(&mut self, goal: Goal) -> &AppState {
        let calls = self.submit(Event::SetGoal(goal));
        self.drive(calls).await
    }

    /// Set the goal and ask for three strategies.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError::InvalidInput` for an empty description; no
    /// request is sent in that case. A failed generation is not an error:
    /// the state returns to the input screen with a message in
    /// [`AppState::error`].
    pub async fn generate_strategies(&mut self, params: &GenerateStrategies) -> Result<&AppState> {
        let calls = self.begin_generate_strategies(params)?;
        Ok(self.drive(calls).await)
    }

    pub fn begin_generate_strategies(&mut self, params: &GenerateStrategies) -> Result<Vec<PendingCall>> {
        params.validate()?;
        let mut calls = self.submit(Event::SetGoal(Goal::from(params.clone())));
        calls.extend(self.submit(Event::Generate));
        Ok(calls)
    }

    /// Open a strategy by ID or 1-based position, generating its plan if
    /// there is none for the active language.
    pub async fn select_strategy(&mut self, reference: &str) -> Result<&AppState> {
        let calls = self.begin_select_strategy(reference)?;
        Ok(self.drive(calls).await)
    }

    pub fn begin_select_strategy(&mut self, reference: &str) -> Result<Vec<PendingCall>> {
        let Some(strategy) = self.state.resolve_strategy(reference) else {
            return Err(AssistantError::invalid_input("strategy")
                .with_reason(format!("No strategy matches '{reference}'")));
        };
        let strategy_id = strategy.id.clone();
        Ok(self.submit(Event::SelectStrategy { strategy_id }))
    }

    /// Expand a step (by ID or position in the open plan), or flip its
    /// visibility if its sub-steps already exist.
    pub async fn expand_step(&mut self, reference: &str) -> Result<&AppState> {
        let calls = self.begin_expand_step(reference)?;
        Ok(self.drive(calls).await)
    }

    pub fn begin_expand_step(&mut self, reference: &str) -> Result<Vec<PendingCall>> {
        let Some(step) = self.state.resolve_step(reference) else {
            return Err(AssistantError::invalid_input("step_id")
                .with_reason(format!("No step matches '{reference}'")));
        };
        let step_id = step.id.clone();
        Ok(self.submit(Event::ToggleStep { step_id }))
    }

    /// Open a resource's acquisition plan, generating it if needed.
    pub async fn open_resource(&mut self, name: &str) -> Result<&AppState> {
        let calls = self.begin_open_resource(name)?;
        Ok(self.drive(calls).await)
    }

    pub fn begin_open_resource(&mut self, name: &str) -> Result<Vec<PendingCall>> {
        if crate::registry::canonical_name(name).is_empty() {
            return Err(AssistantError::invalid_input("name").with_reason("Resource name cannot be empty"));
        }
        Ok(self.submit(Event::OpenResource {
            name: name.to_string(),
        }))
    }

    pub async fn close_resource(&mut self) -> &AppState {
        let calls = self.submit(Event::CloseResource);
        self.drive(calls).await
    }

    /// Switch the output language. The open plan and open resource are
    /// regenerated right away if they were produced in another language.
    pub async fn set_language(&mut self, language: Language) -> &AppState {
        let calls = self.begin_set_language(language);
        self.drive(calls).await
    }

    pub fn begin_set_language(&mut self, language: Language) -> Vec<PendingCall> {
        info!("Switching language to {}", language.display_name());
        self.submit(Event::SetLanguage(language))
    }

    pub async fn back(&mut self) -> &AppState {
        let calls = self.submit(Event::Back);
        self.drive(calls).await
    }

    /// Drop everything and return to the input screen. Responses still in
    /// flight are ignored when they arrive.
    pub async fn reset(&mut self) -> &AppState {
        let calls = self.submit(Event::Reset);
        self.drive(calls).await
    }

    /// Apply the answer to an earlier [`PendingCall`], returning any calls
    /// the new state asks for. Answers from a superseded generation change
    /// nothing.
    pub fn complete(&mut self, completion: Completion) -> Vec<PendingCall> {
        let event = self.completion_event(completion);
        self.submit(event)
    }

    /// Send `calls` one after another, applying each answer before the
    /// next call goes out.
    async fn drive(&mut self, calls: Vec<PendingCall>) -> &AppState {
        let mut pending = VecDeque::from(calls);
        while let Some(call) = pending.pop_front() {
            let completion = call.send().await;
            pending.extend(self.complete(completion));
        }
        &self.state
    }

    fn submit(&mut self, event: Event) -> Vec<PendingCall> {
        let state = std::mem::take(&mut self.state);
        let Transition { state, effects } = state.apply(event);
        self.state = state;
        effects
            .into_iter()
            .map(|effect| PendingCall::new(Arc::clone(&self.client), effect))
            .collect()
    }

    /// Turn a raw answer into its completion event.
    fn completion_event(&mut self, completion: Completion) -> Event {
        let Completion { effect, result } = completion;
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                if e.is_generation_failure() {
                    warn!("{} request failed: {e}", effect.request.kind.as_str());
                } else {
                    error!("{} request could not be issued: {e}", effect.request.kind.as_str());
                }
                return effect.failed(e.to_string());
            }
        };

        let generation = effect.generation;
        let language = effect.request.language;
        match effect.target {
            EffectTarget::Strategies => Event::StrategiesLoaded {
                generation,
                strategies: normalize::normalize_strategies(&raw, &mut self.ids),
            },
            EffectTarget::Plan { strategy_id } => Event::PlanLoaded {
                generation,
                strategy_id,
                plan: normalize::normalize_plan(&raw, language, &mut self.ids),
                language,
            },
            EffectTarget::SubSteps { step_id } => Event::SubStepsLoaded {
                generation,
                step_id,
                sub_steps: normalize::normalize_steps(&raw, language, &mut self.ids),
                language,
            },
            EffectTarget::Resource { resource_id } => Event::ResourceLoaded {
                generation,
                resource_id,
                steps: normalize::normalize_steps(&raw, language, &mut self.ids),
                language,
            },
        }
    }
}
