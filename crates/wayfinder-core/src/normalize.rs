//! Conversion of raw model output into typed domain records.
//!
//! The model answers with JSON text that is only loosely shaped like the
//! schema it was given. Everything here is lenient: a payload that is not a
//! JSON array becomes an empty list, entries that are not objects are
//! dropped, and missing fields take defaults. Nothing untyped leaves this
//! module.

use jiff::Timestamp;
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::models::{Group, Language, PlanItem, Step, Strategy};

type Record = Map<String, Value>;

/// Mints identities that stay unique for the lifetime of a session.
///
/// Each identity combines a time-based seed taken when the minter is
/// created with a per-minter counter, so two minters created at different
/// times never collide and one minter never repeats itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdMinter {
    seed: String,
    counter: u64,
}

impl IdMinter {
    /// Creates a minter seeded from the current time.
    pub fn new() -> Self {
        Self::with_seed(Timestamp::now().as_millisecond().to_string())
    }

    /// Creates a minter with a fixed seed.
    pub fn with_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            counter: 0,
        }
    }

    /// Mint the next identity, e.g. `step-1718000000000-7`.
    pub fn mint(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}-{}-{}", self.seed, self.counter)
    }
}

impl Default for IdMinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse model text into a list of object records.
///
/// Accepts a bare JSON array, optionally wrapped in a Markdown code fence.
/// Anything else yields an empty list.
pub fn parse_records(raw: &str) -> Vec<Record> {
    let body = strip_code_fence(raw.trim());
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(entries)) => {
            let total = entries.len();
            let records: Vec<Record> = entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect();
            if records.len() != total {
                warn!(
                    "Dropped {} non-object entries from model output",
                    total - records.len()
                );
            }
            records
        }
        Ok(other) => {
            warn!("Model output is not an array (got {}), treating as empty", kind_of(&other));
            Vec::new()
        }
        Err(e) => {
            warn!("Model output is not valid JSON, treating as empty: {e}");
            Vec::new()
        }
    }
}

/// Normalize a strategy list. Entries without a title are skipped.
pub fn normalize_strategies(raw: &str, ids: &mut IdMinter) -> Vec<Strategy> {
    let strategies: Vec<Strategy> = parse_records(raw)
        .iter()
        .filter_map(|record| {
            let title = text_field(record, "title")?;
            let description = text_field(record, "description").unwrap_or_default();
            Some(Strategy::new(ids.mint("strat"), title, description))
        })
        .collect();
    debug!("Normalized {} strategies", strategies.len());
    strategies
}

/// Normalize a plan item list.
///
/// Items flagged `parallel` with a non-empty `steps` list become a
/// [`Group`]; everything else becomes a single [`Step`].
pub fn normalize_plan(raw: &str, language: Language, ids: &mut IdMinter) -> Vec<PlanItem> {
    let items: Vec<PlanItem> = parse_records(raw)
        .iter()
        .map(|record| {
            let is_parallel = text_field(record, "type").is_some_and(|t| t.eq_ignore_ascii_case("parallel"));
            let children = record
                .get("steps")
                .and_then(Value::as_array)
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(Value::as_object)
                        .map(|child| step_from_record(child, language, ids))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            if is_parallel && !children.is_empty() {
                PlanItem::Parallel(Group {
                    id: ids.mint("group"),
                    steps: children,
                })
            } else {
                PlanItem::Single(step_from_record(record, language, ids))
            }
        })
        .collect();
    debug!("Normalized {} plan items", items.len());
    items
}

/// Normalize a flat step list (expansion or acquisition output).
pub fn normalize_steps(raw: &str, language: Language, ids: &mut IdMinter) -> Vec<Step> {
    parse_records(raw)
        .iter()
        .map(|record| step_from_record(record, language, ids))
        .collect()
}

/// Names written in `[bracket]` notation inside `text`, in order.
///
/// # Examples
///
/// ```rust
/// use wayfinder_core::normalize::bracket_mentions;
///
/// let names = bracket_mentions("Preheat the [oven] and grease a [loaf tin]");
/// assert_eq!(names, vec!["oven", "loaf tin"]);
/// ```
pub fn bracket_mentions(text: &str) -> Vec<String> {
    let mut mentions = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            break;
        };
        let name = after[..close].trim();
        if !name.is_empty() {
            mentions.push(name.to_string());
        }
        rest = &after[close + 1..];
    }
    mentions
}

fn step_from_record(record: &Record, language: Language, ids: &mut IdMinter) -> Step {
    let instruction = text_field(record, "instruction")
        .unwrap_or_else(|| language.missing_instruction().to_string());
    let mut resources = string_list(record, "resources");
    if resources.is_empty() {
        resources = bracket_mentions(&instruction);
    }
    Step::new(ids.mint("step"), instruction, resources)
}

fn text_field(record: &Record, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(record: &Record, key: &str) -> Vec<String> {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line.
    let inner = inner.split_once('\n').map_or("", |(_, body)| body);
    inner.trim_end().strip_suffix("```").unwrap_or(inner).trim()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
