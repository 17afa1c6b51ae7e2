//! Core library for the Wayfinder planning assistant.
//!
//! Wayfinder turns a goal into three candidate strategies, a step-by-step
//! plan for the chosen strategy, on-demand sub-steps for any step, and
//! acquisition plans for the resources (tools, materials, apps) the steps
//! mention. Every piece of content comes from a language model and is
//! generated lazily.
//!
//! # Layers
//!
//! - [`prompts`] builds a [`prompts::GenerationRequest`] per generation
//!   phase; [`client`] sends it to the model.
//! - [`normalize`] turns loosely-shaped model output into typed [`models`].
//! - [`plan_tree`] and [`registry`] update the step tree and the resource
//!   registry by identity.
//! - [`state`] is the pure view state machine; [`assistant`] drives it,
//!   running the model calls it asks for.
//! - [`display`] renders models and screens as Markdown.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wayfinder_core::{params::GenerateStrategies, AssistantBuilder, ScreenView};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut assistant = AssistantBuilder::new().build()?;
//!
//! let params = GenerateStrategies {
//!     description: "Learn to bake bread".to_string(),
//!     quantification: Some("one loaf a week".to_string()),
//!     environment: Some("small apartment kitchen".to_string()),
//! };
//! let state = assistant.generate_strategies(&params).await?;
//! println!("{}", ScreenView(state));
//!
//! assistant.select_strategy("2").await?;
//! assistant.expand_step("1").await?;
//! println!("{}", ScreenView(assistant.state()));
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod normalize;
pub mod params;
pub mod plan_tree;
pub mod prompts;
pub mod registry;
pub mod state;

// Re-export commonly used types
pub use assistant::{Assistant, AssistantBuilder, Completion, PendingCall};
pub use client::{GeminiClient, ModelClient};
pub use config::AssistantConfig;
pub use display::{OperationStatus, Resources, ScreenView, Strategies};
pub use error::{AssistantError, Result};
pub use models::{Goal, Group, Language, PlanItem, Resource, Step, Strategy};
pub use params::{ExpandStep, GenerateStrategies, OpenResource, SelectStrategy, SetLanguage};
pub use prompts::{GenerationRequest, RequestKind};
pub use registry::ResourceRegistry;
pub use state::{AppState, View};
