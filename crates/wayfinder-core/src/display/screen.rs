//! Rendering of the whole current screen.

use std::fmt;

use super::{models::fmt_plan, Resources, Strategies};
use crate::state::{AppState, View};

/// Wrapper rendering whatever screen `AppState::view` names.
///
/// # Examples
///
/// ```rust
/// use wayfinder_core::{display::ScreenView, models::Language, state::AppState};
///
/// let state = AppState::new(Language::English);
/// assert!(ScreenView(&state).to_string().contains("Describe your goal"));
/// ```
pub struct ScreenView<'a>(pub &'a AppState);

impl ScreenView<'_> {
    fn fmt_goal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let goal = &self.0.goal;
        writeln!(f, "# {}", goal.description)?;
        writeln!(f)?;
        if !goal.quantification.is_empty() {
            writeln!(f, "- **Target**: {}", goal.quantification)?;
        }
        if !goal.environment.is_empty() {
            writeln!(f, "- **Environment**: {}", goal.environment)?;
        }
        writeln!(f, "- **Language**: {}", self.0.language)?;
        writeln!(f)
    }

    fn fmt_error(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.0.error {
            writeln!(f, "> **Error**: {error}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for ScreenView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        match state.view {
            View::Input => {
                writeln!(f, "# Wayfinder")?;
                writeln!(f)?;
                self.fmt_error(f)?;
                let goal = &state.goal;
                if goal.description.is_empty() {
                    writeln!(f, "Describe your goal to get started.")?;
                } else {
                    writeln!(f, "Goal: {}", goal.description)?;
                }
                if !goal.quantification.is_empty() {
                    writeln!(f, "- **Target**: {}", goal.quantification)?;
                }
                if !goal.environment.is_empty() {
                    writeln!(f, "- **Environment**: {}", goal.environment)?;
                }
                Ok(())
            }
            View::Processing => {
                self.fmt_goal(f)?;
                writeln!(f, "*Generating...*")
            }
            View::Selection => {
                self.fmt_goal(f)?;
                self.fmt_error(f)?;
                writeln!(f, "## Strategies")?;
                writeln!(f)?;
                write!(f, "{}", Strategies(state.strategies.clone()))
            }
            View::Detail => {
                self.fmt_goal(f)?;
                self.fmt_error(f)?;
                if let Some(strategy) = state.selected_strategy() {
                    writeln!(f, "## {}", strategy.title)?;
                    writeln!(f)?;
                    if !strategy.description.is_empty() {
                        writeln!(f, "{}", strategy.description)?;
                        writeln!(f)?;
                    }
                    fmt_plan(f, &strategy.plan)?;
                    writeln!(f)?;
                }
                writeln!(f, "## Resources")?;
                writeln!(f)?;
                write!(f, "{}", Resources(state.resources.as_slice().to_vec()))?;
                if let Some(resource) = state.selected_resource() {
                    writeln!(f)?;
                    write!(f, "{resource}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Goal, Language, PlanItem, Step, Strategy},
        state::Event,
    };

    fn goal() -> Goal {
        Goal {
            description: "Learn to bake bread".to_string(),
            quantification: "one loaf".to_string(),
            environment: String::new(),
        }
    }

    #[test]
    fn test_input_screen_shows_error() {
        let state = AppState::new(Language::English).apply(Event::Generate).state;
        let output = ScreenView(&state).to_string();
        assert!(output.contains("**Error**"));
    }

    #[test]
    fn test_input_screen_shows_goal_context() {
        let goal = Goal {
            environment: "no mixer".to_string(),
            ..goal()
        };
        let state = AppState::new(Language::English).apply(Event::SetGoal(goal)).state;
        let output = ScreenView(&state).to_string();
        assert!(output.contains("Goal: Learn to bake bread"));
        assert!(output.contains("- **Target**: one loaf"));
        assert!(output.contains("- **Environment**: no mixer"));
    }

    #[test]
    fn test_selection_and_detail_screens() {
        let state = AppState::new(Language::English)
            .apply(Event::SetGoal(goal()))
            .state
            .apply(Event::Generate);
        let generation = state.effects[0].generation;
        let mut strategy = Strategy::new("st1", "Sourdough", "Grow a starter");
        strategy.plan = vec![PlanItem::Single(Step::new("s1", "Buy [flour]", vec!["flour".to_string()]))];
        strategy.plan_language = Some(Language::English);

        let state = state
            .state
            .apply(Event::StrategiesLoaded {
                generation,
                strategies: vec![strategy],
            })
            .state;
        let output = ScreenView(&state).to_string();
        assert!(output.contains("# Learn to bake bread"));
        assert!(output.contains("- **Target**: one loaf"));
        assert!(output.contains("1. **Sourdough**"));

        let state = state
            .apply(Event::SelectStrategy {
                strategy_id: "st1".to_string(),
            })
            .state;
        let output = ScreenView(&state).to_string();
        assert!(output.contains("## Sourdough"));
        assert!(output.contains("1. Buy [flour] `s1`"));
        assert!(output.contains("## Resources"));
    }
}
