//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::models::{Resource, Strategy};

/// Newtype wrapper for displaying the strategy list.
///
/// Strategies are numbered from 1, matching the positions accepted by
/// `AppState::resolve_strategy`.
///
/// # Examples
///
/// ```rust
/// use wayfinder_core::{display::Strategies, models::Strategy};
///
/// let strategies = Strategies(vec![
///     Strategy::new("st-1", "Sourdough", "Grow a starter"),
///     Strategy::new("st-2", "Yeasted", "Use instant yeast"),
/// ]);
/// let output = strategies.to_string();
/// assert!(output.contains("1. **Sourdough**"));
/// assert!(output.contains("2. **Yeasted**"));
/// ```
pub struct Strategies(pub Vec<Strategy>);

impl Strategies {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of strategies in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the strategies.
    pub fn iter(&self) -> std::slice::Iter<'_, Strategy> {
        self.0.iter()
    }
}

impl Index<usize> for Strategies {
    type Output = Strategy;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Strategies {
    type Item = &'a Strategy;
    type IntoIter = std::slice::Iter<'a, Strategy>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Strategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No strategies yet.");
        }
        for (idx, strategy) in self.0.iter().enumerate() {
            write!(f, "{}. **{}**", idx + 1, strategy.title)?;
            if !strategy.description.is_empty() {
                write!(f, ": {}", strategy.description)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying the resource registry as a list.
pub struct Resources(pub Vec<Resource>);

impl Resources {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No resources mentioned.");
        }
        for resource in &self.0 {
            let status = if resource.is_loading {
                " *(loading)*"
            } else if resource.steps.as_ref().is_some_and(|s| !s.is_empty()) {
                " *(ready)*"
            } else {
                ""
            };
            writeln!(f, "- [{}]{status}", resource.name)?;
        }
        Ok(())
    }
}
