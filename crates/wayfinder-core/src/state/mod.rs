//! Application state and the view state machine.
//!
//! All state changes go through [`AppState::apply`], a transition function
//! `(state, event) -> (state, effects)`. The reducer never performs I/O:
//! model calls it wants issued come back as [`Effect`]s for the driver
//! ([`crate::assistant::Assistant`]) to run, and their results come back in
//! as completion events.
//!
//! # Screens
//!
//! ```text
//!            generate              success
//!   Input ─────────────▶ Processing ─────────▶ Selection
//!     ▲                     │  ▲                 │   ▲
//!     └──── failure ────────┘  └─ select (stale) ┘   │ back
//!                               success ──▶ Detail ──┘
//!   Selection ── select (cached) ──▶ Detail
//!   any ── reset ──▶ Input
//! ```
//!
//! Only one top-level generation (strategies or plan) is in flight at a
//! time: `Generate` and `SelectStrategy` are ignored while in
//! [`View::Processing`]. Step expansions and resource fetches are keyed by
//! identity and may overlap freely.

use serde::Serialize;

use crate::{
    models::{Goal, Language, Resource, Step, Strategy},
    normalize::IdMinter,
    plan_tree,
    registry::ResourceRegistry,
};

mod events;
mod reducer;


pub use events::{Effect, EffectTarget, Event, Transition};

/// Message shown when a top-level generation fails for any reason.
pub const GENERIC_ERROR: &str = "Something went wrong while generating. Please try again.";

/// Message shown when generation is requested without a goal.
pub const EMPTY_GOAL_ERROR: &str = "Please describe your goal first.";

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Input,
    Processing,
    Selection,
    Detail,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Input => "input",
            View::Processing => "processing",
            View::Selection => "selection",
            View::Detail => "detail",
        }
    }
}

/// The whole application state. Owns the strategies and the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    pub view: View,
    pub goal: Goal,
    pub language: Language,
    pub strategies: Vec<Strategy>,
    pub selected_strategy: Option<String>,
    pub resources: ResourceRegistry,
    pub selected_resource: Option<String>,
    /// User-facing error from the last failed action
    pub error: Option<String>,
    /// Bumped by reset and by each new strategy generation
    pub generation: u64,
    #[serde(skip)]
    ids: IdMinter,
}

impl AppState {
    pub fn new(language: Language) -> Self {
        Self::with_minter(language, IdMinter::new())
    }

    /// Creates a state whose resource identities come from `ids`.
    pub fn with_minter(language: Language, ids: IdMinter) -> Self {
        Self {
            view: View::Input,
            goal: Goal::default(),
            language,
            strategies: Vec::new(),
            selected_strategy: None,
            resources: ResourceRegistry::new(),
            selected_resource: None,
            error: None,
            generation: 0,
            ids,
        }
    }

    pub fn strategy(&self, id: &str) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.id == id)
    }

    pub fn selected_strategy(&self) -> Option<&Strategy> {
        self.selected_strategy.as_deref().and_then(|id| self.strategy(id))
    }

    pub fn selected_resource(&self) -> Option<&Resource> {
        self.selected_resource.as_deref().and_then(|id| self.resources.get(id))
    }

    /// Resolve a strategy reference: an ID, or a 1-based position.
    pub fn resolve_strategy(&self, reference: &str) -> Option<&Strategy> {
        let reference = reference.trim();
        self.strategy(reference).or_else(|| {
            reference
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|idx| self.strategies.get(idx))
        })
    }

    /// Resolve a step reference: an ID at any depth, or a 1-based position
    /// among the top-level steps of the open plan (group members counted
    /// in order).
    pub fn resolve_step(&self, reference: &str) -> Option<&Step> {
        let reference = reference.trim();
        self.find_step(reference).or_else(|| {
            let idx = reference.parse::<usize>().ok()?.checked_sub(1)?;
            self.selected_strategy()?
                .plan
                .iter()
                .flat_map(|item| item.steps())
                .nth(idx)
        })
    }

    /// Find a step in any strategy's plan or any acquisition plan.
    pub fn find_step(&self, step_id: &str) -> Option<&Step> {
        self.strategies
            .iter()
            .find_map(|s| plan_tree::find_step(&s.plan, step_id))
            .or_else(|| {
                self.resources
                    .iter()
                    .filter_map(|r| r.steps.as_deref())
                    .find_map(|steps| plan_tree::find_in_steps(steps, step_id))
            })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Language::default())
    }
}
