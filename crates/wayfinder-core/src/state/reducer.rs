//! The state transition function.

use log::{debug, warn};

use super::{AppState, Effect, EffectTarget, Event, Transition, View, EMPTY_GOAL_ERROR, GENERIC_ERROR};
use crate::{
    models::{Language, PlanItem, ResourcePatch, StepPatch},
    plan_tree, prompts,
};

impl AppState {
    /// Apply one event, returning the next state and any model calls to
    /// issue.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wayfinder_core::models::{Goal, Language};
    /// use wayfinder_core::state::{AppState, Event, View};
    ///
    /// let state = AppState::new(Language::English);
    /// let state = state
    ///     .apply(Event::SetGoal(Goal {
    ///         description: "Learn to bake bread".to_string(),
    ///         ..Default::default()
    ///     }))
    ///     .state;
    ///
    /// let transition = state.apply(Event::Generate);
    /// assert_eq!(transition.state.view, View::Processing);
    /// assert_eq!(transition.effects.len(), 1);
    /// ```
    pub fn apply(self, event: Event) -> Transition {
        debug!("apply: view={} event={}", self.view.as_str(), event_name(&event));
        match event {
            Event::SetGoal(goal) => Transition::idle(AppState {
                goal,
                error: None,
                ..self
            }),
            Event::SetLanguage(language) => self.set_language(language),
            Event::Generate => self.generate(),
            Event::StrategiesLoaded { generation, strategies } => {
                if self.is_stale(generation) || self.view != View::Processing {
                    return self.discard("strategies");
                }
                if strategies.is_empty() {
                    return Transition::idle(AppState {
                        view: View::Input,
                        error: Some(GENERIC_ERROR.to_string()),
                        ..self
                    });
                }
                Transition::idle(AppState {
                    view: View::Selection,
                    strategies,
                    error: None,
                    ..self
                })
            }
            Event::StrategiesFailed { generation, message } => {
                if self.is_stale(generation) || self.view != View::Processing {
                    return self.discard("strategies failure");
                }
                warn!("Strategy generation failed: {message}");
                Transition::idle(AppState {
                    view: View::Input,
                    error: Some(GENERIC_ERROR.to_string()),
                    ..self
                })
            }
            Event::SelectStrategy { strategy_id } => self.select_strategy(&strategy_id),
            Event::PlanLoaded {
                generation,
                strategy_id,
                plan,
                language,
            } => self.plan_loaded(generation, &strategy_id, plan, language),
            Event::PlanFailed {
                generation,
                strategy_id,
                message,
            } => {
                if self.is_stale(generation) {
                    return self.discard("plan failure");
                }
                warn!("Plan generation for {strategy_id} failed: {message}");
                Transition::idle(self.plan_not_loaded(&strategy_id))
            }
            Event::ToggleStep { step_id } => self.toggle_step(&step_id),
            Event::SubStepsLoaded {
                generation,
                step_id,
                sub_steps,
                language,
            } => {
                if self.is_stale(generation) {
                    return self.discard("sub-steps");
                }
                if sub_steps.is_empty() {
                    warn!("Expansion of {step_id} returned no sub-steps");
                    return Transition::idle(self.patch_step(&step_id, &StepPatch::loading(false)));
                }
                let mentions = plan_tree::steps_mentions(&sub_steps);
                let state = self.patch_step(&step_id, &StepPatch::expansion_loaded(sub_steps));
                Transition::idle(state.merge_mentions(&mentions, language))
            }
            Event::ExpansionFailed {
                generation,
                step_id,
                message,
            } => {
                if self.is_stale(generation) {
                    return self.discard("expansion failure");
                }
                warn!("Expansion of {step_id} failed: {message}");
                Transition::idle(self.patch_step(&step_id, &StepPatch::loading(false)))
            }
            Event::OpenResource { name } => self.open_resource(&name),
            Event::CloseResource => Transition::idle(AppState {
                selected_resource: None,
                ..self
            }),
            Event::ResourceLoaded {
                generation,
                resource_id,
                steps,
                language,
            } => {
                if self.is_stale(generation) {
                    return self.discard("resource");
                }
                if steps.is_empty() {
                    warn!("Acquisition plan for {resource_id} came back empty");
                    let resources = self.resources.replace(&resource_id, &ResourcePatch::loading(false));
                    return Transition::idle(AppState { resources, ..self });
                }
                let mentions = plan_tree::steps_mentions(&steps);
                let resources = self
                    .resources
                    .replace(&resource_id, &ResourcePatch::loaded(steps, language));
                Transition::idle(AppState { resources, ..self }.merge_mentions(&mentions, language))
            }
            Event::ResourceFailed {
                generation,
                resource_id,
                message,
            } => {
                if self.is_stale(generation) {
                    return self.discard("resource failure");
                }
                warn!("Acquisition plan for {resource_id} failed: {message}");
                let resources = self.resources.replace(&resource_id, &ResourcePatch::loading(false));
                Transition::idle(AppState { resources, ..self })
            }
            Event::Back => match self.view {
                View::Detail => Transition::idle(AppState {
                    view: View::Selection,
                    selected_resource: None,
                    ..self
                }),
                _ => Transition::idle(self),
            },
            Event::Reset => {
                let mut fresh = AppState::with_minter(self.language, self.ids);
                fresh.generation = self.generation + 1;
                Transition::idle(fresh)
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        generation != self.generation
    }

    fn discard(self, what: &str) -> Transition {
        warn!("Discarding {what} completion from a superseded generation");
        Transition::idle(self)
    }

    fn generate(self) -> Transition {
        if self.view == View::Processing {
            debug!("generate: already processing, ignoring");
            return Transition::idle(self);
        }
        if self.goal.description.trim().is_empty() {
            return Transition::idle(AppState {
                view: View::Input,
                error: Some(EMPTY_GOAL_ERROR.to_string()),
                ..self
            });
        }

        let generation = self.generation + 1;
        let request = prompts::strategies_request(&self.goal, self.language);
        // Fetches issued under the old generation will be discarded on arrival
        let resources = self.resources.settle();
        let state = AppState {
            view: View::Processing,
            resources,
            strategies: Vec::new(),
            selected_strategy: None,
            selected_resource: None,
            error: None,
            generation,
            ..self
        };
        Transition::with_effect(
            state,
            Effect {
                generation,
                target: EffectTarget::Strategies,
                request,
            },
        )
    }

    fn select_strategy(self, strategy_id: &str) -> Transition {
        if self.view == View::Processing {
            debug!("select_strategy: already processing, ignoring");
            return Transition::idle(self);
        }
        let Some(strategy) = self.strategy(strategy_id) else {
            warn!("select_strategy: unknown strategy {strategy_id}");
            return Transition::idle(self);
        };

        if strategy.has_plan_for(self.language) {
            return Transition::idle(AppState {
                view: View::Detail,
                selected_strategy: Some(strategy_id.to_string()),
                error: None,
                ..self
            });
        }

        let effect = self.plan_effect(strategy_id);
        let state = AppState {
            view: View::Processing,
            selected_strategy: Some(strategy_id.to_string()),
            error: None,
            ..self
        };
        match effect {
            Some(effect) => Transition::with_effect(state, effect),
            None => Transition::idle(state),
        }
    }

    fn plan_effect(&self, strategy_id: &str) -> Option<Effect> {
        let strategy = self.strategy(strategy_id)?;
        Some(Effect {
            generation: self.generation,
            target: EffectTarget::Plan {
                strategy_id: strategy_id.to_string(),
            },
            request: prompts::plan_request(&self.goal, strategy, self.language),
        })
    }

    fn plan_loaded(
        self,
        generation: u64,
        strategy_id: &str,
        plan: Vec<PlanItem>,
        language: Language,
    ) -> Transition {
        if self.is_stale(generation) {
            return self.discard("plan");
        }
        if plan.is_empty() {
            warn!("Plan for {strategy_id} came back empty");
            return Transition::idle(self.plan_not_loaded(strategy_id));
        }

        let mentions = plan_tree::resource_mentions(&plan);
        let awaiting = self.view == View::Processing
            && self.selected_strategy.as_deref() == Some(strategy_id);

        let mut state = self;
        if let Some(strategy) = state.strategies.iter_mut().find(|s| s.id == strategy_id) {
            strategy.plan = plan;
            strategy.plan_language = Some(language);
        }
        if awaiting {
            state.view = View::Detail;
            state.error = None;
        }
        Transition::idle(state.merge_mentions(&mentions, language))
    }

    /// Return to the selection screen after a plan could not be produced.
    fn plan_not_loaded(self, strategy_id: &str) -> AppState {
        let awaiting = self.view == View::Processing
            && self.selected_strategy.as_deref() == Some(strategy_id);
        if !awaiting {
            return self;
        }
        AppState {
            view: View::Selection,
            selected_strategy: None,
            error: Some(GENERIC_ERROR.to_string()),
            ..self
        }
    }

    fn set_language(self, language: Language) -> Transition {
        if language == self.language {
            return Transition::idle(self);
        }
        let mut state = AppState { language, ..self };
        let mut effects = Vec::new();

        let stale_plan = state.view == View::Detail
            && state
                .selected_strategy()
                .is_some_and(|s| !s.has_plan_for(language));
        if stale_plan {
            let effect = state
                .selected_strategy
                .as_deref()
                .and_then(|id| state.plan_effect(id));
            if let Some(effect) = effect {
                state.view = View::Processing;
                effects.push(effect);
            }
        }

        let open_resource = state.selected_resource().map(|r| r.name.clone());
        if let Some(name) = open_resource {
            let transition = state.open_resource(&name);
            state = transition.state;
            effects.extend(transition.effects);
        }

        Transition { state, effects }
    }

    fn toggle_step(self, step_id: &str) -> Transition {
        let Some(step) = self.find_step(step_id) else {
            warn!("toggle_step: unknown step {step_id}");
            return Transition::idle(self);
        };
        if step.is_loading {
            debug!("toggle_step: {step_id} is already loading");
            return Transition::idle(self);
        }
        if step.has_sub_steps() {
            let patch = StepPatch::expanded(!step.is_expanded);
            return Transition::idle(self.patch_step(step_id, &patch));
        }

        let request = prompts::expand_step_request(&self.goal, &step.instruction, self.language);
        let effect = Effect {
            generation: self.generation,
            target: EffectTarget::SubSteps {
                step_id: step_id.to_string(),
            },
            request,
        };
        Transition::with_effect(self.patch_step(step_id, &StepPatch::loading(true)), effect)
    }

    fn open_resource(self, name: &str) -> Transition {
        if let Some(existing) = self.resources.find_by_name(name) {
            if existing.is_loading {
                debug!("open_resource: {} is already loading", existing.name);
                let selected = Some(existing.id.clone());
                return Transition::idle(AppState {
                    selected_resource: selected,
                    ..self
                });
            }
        }

        let mut state = self;
        let click = state.resources.click(name, state.language, &mut state.ids);
        let effect = click.needs_fetch.then(|| {
            let display = click
                .registry
                .get(&click.resource_id)
                .map_or_else(|| name.to_string(), |r| r.name.clone());
            Effect {
                generation: state.generation,
                target: EffectTarget::Resource {
                    resource_id: click.resource_id.clone(),
                },
                request: prompts::resource_request(&state.goal, &display, state.language),
            }
        });
        state.resources = click.registry;
        state.selected_resource = Some(click.resource_id);

        match effect {
            Some(effect) => Transition::with_effect(state, effect),
            None => Transition::idle(state),
        }
    }

    /// Patch a step wherever it lives. Unknown IDs change nothing.
    fn patch_step(self, step_id: &str, patch: &StepPatch) -> AppState {
        let in_plan = self
            .strategies
            .iter()
            .any(|s| plan_tree::find_step(&s.plan, step_id).is_some());

        if in_plan {
            let strategies = self
                .strategies
                .iter()
                .map(|s| {
                    let mut s = s.clone();
                    s.plan = plan_tree::replace_step(&s.plan, step_id, patch);
                    s
                })
                .collect();
            AppState { strategies, ..self }
        } else {
            let resources = self.resources.replace_step(step_id, patch);
            AppState { resources, ..self }
        }
    }

    fn merge_mentions(mut self, mentions: &[String], language: Language) -> AppState {
        let (resources, _added) = self.resources.extract_and_merge(mentions, language, &mut self.ids);
        self.resources = resources;
        self
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::SetGoal(_) => "set_goal",
        Event::SetLanguage(_) => "set_language",
        Event::Generate => "generate",
        Event::StrategiesLoaded { .. } => "strategies_loaded",
        Event::StrategiesFailed { .. } => "strategies_failed",
        Event::SelectStrategy { .. } => "select_strategy",
        Event::PlanLoaded { .. } => "plan_loaded",
        Event::PlanFailed { .. } => "plan_failed",
        Event::ToggleStep { .. } => "toggle_step",
        Event::SubStepsLoaded { .. } => "sub_steps_loaded",
        Event::ExpansionFailed { .. } => "expansion_failed",
        Event::OpenResource { .. } => "open_resource",
        Event::CloseResource => "close_resource",
        Event::ResourceLoaded { .. } => "resource_loaded",
        Event::ResourceFailed { .. } => "resource_failed",
        Event::Back => "back",
        Event::Reset => "reset",
    }
}
