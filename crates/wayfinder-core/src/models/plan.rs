//! Plan item and group definitions.

use serde::{Deserialize, Serialize};

use super::Step;

/// Steps that can be carried out at the same time. Groups never nest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    /// Unique identifier for the group
    pub id: String,

    /// Parallel peer steps
    pub steps: Vec<Step>,
}

/// One entry in a strategy's plan. Plan order is execution order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlanItem {
    /// A single step
    Single(Step),

    /// A group of steps carried out in parallel
    Parallel(Group),
}

impl PlanItem {
    /// Identifier of the step or group.
    pub fn id(&self) -> &str {
        match self {
            PlanItem::Single(step) => &step.id,
            PlanItem::Parallel(group) => &group.id,
        }
    }

    /// The top-level steps of this item.
    pub fn steps(&self) -> &[Step] {
        match self {
            PlanItem::Single(step) => std::slice::from_ref(step),
            PlanItem::Parallel(group) => &group.steps,
        }
    }

    /// Whether this item is a parallel group.
    pub fn is_parallel(&self) -> bool {
        matches!(self, PlanItem::Parallel(_))
    }
}
