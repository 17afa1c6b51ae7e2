//! Data models for strategies, plans, steps and resources.
//!
//! This module contains the core domain models the assistant manipulates.
//! Display implementations for these models are located in
//! [`crate::display::models`] to keep data structures separate from
//! presentation.
//!
//! # Shape
//!
//! ```text
//! Strategy ──plan──▶ [PlanItem]
//!                       ├─ Single(Step)
//!                       └─ Parallel(Group ──▶ [Step])
//! Step ──sub_steps──▶ [Step] ──sub_steps──▶ ... (unbounded depth)
//! Resource ──steps──▶ [Step] (acquisition plan)
//! ```
//!
//! Model output never reaches these types directly: the
//! [`crate::normalize`] module validates loosely-typed records and builds
//! them.
//!
//! ## Language tags
//!
//! [`Strategy::plan_language`] and [`Resource::language`] record which
//! [`Language`] the cached content was generated in. Read paths compare the
//! tag to the active language before trusting the cache.
//!
//! # Examples
//!
//! ```rust
//! use wayfinder_core::models::{Language, PlanItem, Step, Strategy};
//!
//! let mut strategy = Strategy::new("st-1", "Sourdough", "Start with a starter");
//! assert!(!strategy.has_plan_for(Language::English));
//!
//! strategy.plan = vec![PlanItem::Single(Step::new("s-1", "Feed the starter", vec![]))];
//! strategy.plan_language = Some(Language::English);
//! assert!(strategy.has_plan_for(Language::English));
//! assert!(!strategy.has_plan_for(Language::Chinese));
//! ```

pub mod goal;
pub mod language;
pub mod plan;
pub mod requests;
pub mod resource;
pub mod step;
pub mod strategy;


pub use goal::Goal;
pub use language::Language;
pub use plan::{Group, PlanItem};
pub use requests::{ResourcePatch, StepPatch};
pub use resource::Resource;
pub use step::Step;
pub use strategy::Strategy;
