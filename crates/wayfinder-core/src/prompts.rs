//! Request construction for each generation phase.
//!
//! Every builder here is a pure function of its inputs: it reads the goal
//! and the target language and returns a [`GenerationRequest`] carrying the
//! task text, a system instruction pinning the output language, and the
//! JSON schema the model must answer with.

use serde::Serialize;
use serde_json::{json, Value};

use crate::models::{Goal, Language, Strategy};

/// Instruction appended to every prompt that can mention resources.
pub const RESOURCE_NOTATION: &str = "Wrap every tool, material, app or other resource you mention \
     in square brackets, for example [stand mixer], and also list those names without brackets \
     in the \"resources\" field of the same entry.";

/// The four kinds of generation the assistant asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Three high-level strategies for the goal
    Strategies,
    /// A 3 to 5 item execution plan for one strategy
    Plan,
    /// 3 to 5 sub-steps for one step
    ExpandStep,
    /// A 3 to 5 step acquisition plan for one resource
    AcquireResource,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Strategies => "strategies",
            RequestKind::Plan => "plan",
            RequestKind::ExpandStep => "expand_step",
            RequestKind::AcquireResource => "acquire_resource",
        }
    }
}

/// A fully-formed request for the model client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub kind: RequestKind,
    pub language: Language,
    /// Free-text task description
    pub prompt: String,
    /// System-level instruction pinning role and output language
    pub system_instruction: String,
    /// Required output shape
    pub schema: Value,
}

/// Request for three strategies toward `goal`.
pub fn strategies_request(goal: &Goal, language: Language) -> GenerationRequest {
    let prompt = format!(
        "{}\nPropose exactly 3 distinct strategies for reaching this goal. \
         Give each a short title and a one to two sentence description.",
        goal_context(goal)
    );

    GenerationRequest {
        kind: RequestKind::Strategies,
        language,
        prompt,
        system_instruction: system_instruction(language),
        schema: array_of(json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" }
            },
            "required": ["title", "description"]
        })),
    }
}

/// Request for an execution plan following `strategy`.
pub fn plan_request(goal: &Goal, strategy: &Strategy, language: Language) -> GenerationRequest {
    let prompt = format!(
        "{}\nChosen strategy: {}. {}\n\
         Write an execution plan of 3 to 5 items in order. An item is either a single step \
         (type \"single\" with an \"instruction\") or a set of steps that can be done at the \
         same time (type \"parallel\" with a \"steps\" list). {RESOURCE_NOTATION}",
        goal_context(goal),
        strategy.title,
        strategy.description
    );

    GenerationRequest {
        kind: RequestKind::Plan,
        language,
        prompt,
        system_instruction: system_instruction(language),
        schema: array_of(json!({
            "type": "OBJECT",
            "properties": {
                "type": { "type": "STRING", "enum": ["single", "parallel"] },
                "instruction": { "type": "STRING" },
                "resources": { "type": "ARRAY", "items": { "type": "STRING" } },
                "steps": { "type": "ARRAY", "items": step_schema() }
            },
            "required": ["type"]
        })),
    }
}

/// Request for sub-steps of one step.
pub fn expand_step_request(goal: &Goal, instruction: &str, language: Language) -> GenerationRequest {
    let prompt = format!(
        "{}\nBreak this step into 3 to 5 smaller, concrete sub-steps: \"{}\". {RESOURCE_NOTATION}",
        goal_context(goal),
        instruction
    );

    GenerationRequest {
        kind: RequestKind::ExpandStep,
        language,
        prompt,
        system_instruction: system_instruction(language),
        schema: array_of(step_schema()),
    }
}

/// Request for an acquisition plan for one resource.
pub fn resource_request(goal: &Goal, resource_name: &str, language: Language) -> GenerationRequest {
    let prompt = format!(
        "{}\nExplain in 3 to 5 steps how to obtain, set up or prepare the resource \"{}\" \
         for this goal. {RESOURCE_NOTATION}",
        goal_context(goal),
        resource_name
    );

    GenerationRequest {
        kind: RequestKind::AcquireResource,
        language,
        prompt,
        system_instruction: system_instruction(language),
        schema: array_of(step_schema()),
    }
}

fn goal_context(goal: &Goal) -> String {
    let mut context = format!("Goal: {}", goal.description);
    if !goal.quantification.is_empty() {
        context.push_str(&format!("\nTarget amount or level: {}", goal.quantification));
    }
    if !goal.environment.is_empty() {
        context.push_str(&format!("\nEnvironment and constraints: {}", goal.environment));
    }
    context
}

fn system_instruction(language: Language) -> String {
    format!(
        "You are a practical planning assistant. Write every title, description and \
         instruction in {}. Respond only with JSON matching the given schema.",
        language.display_name()
    )
}

fn step_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "instruction": { "type": "STRING" },
            "resources": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["instruction"]
    })
}

fn array_of(items: Value) -> Value {
    json!({ "type": "ARRAY", "items": items })
}
