//! Display implementations for domain models.
//!
//! Everything renders as Markdown. Steps render as nested list items; a
//! step's sub-steps are shown only while it is expanded, and a collapsed
//! step that has sub-steps is marked with `(+)`.

use std::fmt;

use crate::{
    models::{Language, PlanItem, Resource, Step, Strategy},
    state::View,
};

/// Indentation per nesting level of a Markdown list.
const INDENT: &str = "   ";

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Step {
    /// Write this step as a list item at `depth`, followed by its visible
    /// sub-steps.
    pub(crate) fn fmt_item(&self, f: &mut fmt::Formatter<'_>, depth: usize, marker: &str) -> fmt::Result {
        let indent = INDENT.repeat(depth);
        write!(f, "{indent}{marker} {} `{}`", self.instruction, self.id)?;
        if self.is_loading {
            write!(f, " *(expanding...)*")?;
        } else if self.has_sub_steps() && !self.is_expanded {
            write!(f, " (+)")?;
        }
        writeln!(f)?;

        if self.is_expanded {
            if let Some(children) = &self.sub_steps {
                for child in children {
                    child.fmt_item(f, depth + 1, "-")?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_item(f, 0, "-")
    }
}

/// Write plan items with one running number across groups, so that the
/// numbers match step positions accepted by `AppState::resolve_step`.
pub(crate) fn fmt_plan(f: &mut fmt::Formatter<'_>, plan: &[PlanItem]) -> fmt::Result {
    let mut number = 0;
    for item in plan {
        if item.is_parallel() {
            writeln!(f, "**In parallel:**")?;
            writeln!(f)?;
        }
        for step in item.steps() {
            number += 1;
            step.fmt_item(f, 0, &format!("{number}."))?;
        }
        if item.is_parallel() {
            writeln!(f)?;
        }
    }
    Ok(())
}

impl fmt::Display for PlanItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_plan(f, std::slice::from_ref(self))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.title)?;
        writeln!(f)?;
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }

        if self.plan.is_empty() {
            writeln!(f, "No plan generated yet.")?;
        } else {
            fmt_plan(f, &self.plan)?;
        }
        Ok(())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Resource: {}", self.name)?;
        writeln!(f)?;

        if self.is_loading {
            writeln!(f, "Preparing an acquisition plan...")?;
            return Ok(());
        }
        match self.steps.as_deref() {
            Some(steps) if !steps.is_empty() => {
                for (idx, step) in steps.iter().enumerate() {
                    step.fmt_item(f, 0, &format!("{}.", idx + 1))?;
                }
                Ok(())
            }
            _ => writeln!(f, "No acquisition plan yet."),
        }
    }
}
