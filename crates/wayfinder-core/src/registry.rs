//! Deduplicated registry of resources mentioned by plan steps.
//!
//! Names are compared case-insensitively after stripping bracket delimiters
//! and surrounding whitespace. The registry is append-only while extracting;
//! existing entries change only through [`ResourceRegistry::replace`] and
//! [`ResourceRegistry::click`].

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    models::{Language, Resource, ResourcePatch, StepPatch},
    normalize::IdMinter,
    plan_tree,
};

/// Canonical display form of a raw mention: brackets stripped, trimmed.
///
/// # Examples
///
/// ```rust
/// use wayfinder_core::registry::canonical_name;
///
/// assert_eq!(canonical_name(" [Stand mixer] "), "Stand mixer");
/// assert_eq!(canonical_name("[]"), "");
/// ```
pub fn canonical_name(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .to_string()
}

/// Outcome of clicking a resource name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceClick {
    /// The registry after selection (and possibly a new loading entry)
    pub registry: ResourceRegistry,
    /// ID of the selected resource
    pub resource_id: String,
    /// Whether an acquisition plan has to be fetched
    pub needs_fetch: bool,
}

/// Ordered, case-insensitively unique collection of resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRegistry {
    resources: Vec<Resource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    pub fn as_slice(&self) -> &[Resource] {
        &self.resources
    }

    /// Case-insensitive lookup by display name (brackets allowed).
    pub fn find_by_name(&self, name: &str) -> Option<&Resource> {
        let canonical = canonical_name(name);
        self.resources.iter().find(|r| r.matches_name(&canonical))
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Merge raw mentions into the registry.
    ///
    /// Returns the updated registry and the resources that were added, in
    /// first-mention order. Existing entries are never altered.
    pub fn extract_and_merge<S: AsRef<str>>(
        &self,
        mentions: &[S],
        language: Language,
        ids: &mut IdMinter,
    ) -> (ResourceRegistry, Vec<Resource>) {
        let mut added: Vec<Resource> = Vec::new();
        for mention in mentions {
            let name = canonical_name(mention.as_ref());
            if name.is_empty() {
                continue;
            }
            let known = self.resources.iter().chain(added.iter()).any(|r| r.matches_name(&name));
            if !known {
                added.push(Resource::new(ids.mint("res"), name, language));
            }
        }

        debug!("Registry merge added {} resources", added.len());
        let mut resources = self.resources.clone();
        resources.extend(added.iter().cloned());
        (ResourceRegistry { resources }, added)
    }

    /// Select a resource by display name.
    ///
    /// A known resource whose acquisition plan is missing or was generated
    /// in another language is marked loading and flagged for fetch. An
    /// unknown name gets a new loading entry.
    pub fn click(&self, display_name: &str, active: Language, ids: &mut IdMinter) -> ResourceClick {
        if let Some(existing) = self.find_by_name(display_name) {
            let needs_fetch = !existing.has_steps_for(active);
            let registry = if needs_fetch {
                self.replace(&existing.id, &ResourcePatch::loading(true))
            } else {
                self.clone()
            };
            return ResourceClick {
                resource_id: existing.id.clone(),
                registry,
                needs_fetch,
            };
        }

        let mut resource = Resource::new(ids.mint("res"), canonical_name(display_name), active);
        resource.is_loading = true;
        let resource_id = resource.id.clone();
        let mut resources = self.resources.clone();
        resources.push(resource);

        ResourceClick {
            registry: ResourceRegistry { resources },
            resource_id,
            needs_fetch: true,
        }
    }

    /// Rebuild with the resource identified by `id` merged with `patch`.
    /// Unknown IDs leave the registry unchanged.
    pub fn replace(&self, id: &str, patch: &ResourcePatch) -> ResourceRegistry {
        ResourceRegistry {
            resources: self
                .resources
                .iter()
                .map(|r| if r.id == id { patch.apply(r) } else { r.clone() })
                .collect(),
        }
    }

    /// Patch a step inside any resource's acquisition plan.
    pub fn replace_step(&self, step_id: &str, patch: &StepPatch) -> ResourceRegistry {
        ResourceRegistry {
            resources: self
                .resources
                .iter()
                .map(|r| Resource {
                    steps: r
                        .steps
                        .as_deref()
                        .map(|steps| plan_tree::replace_in_steps(steps, step_id, patch)),
                    ..r.clone()
                })
                .collect(),
        }
    }

    /// Clear every loading flag, on resources and on steps inside their
    /// acquisition plans. Fetched content is kept.
    pub fn settle(&self) -> ResourceRegistry {
        ResourceRegistry {
            resources: self
                .resources
                .iter()
                .map(|r| Resource {
                    steps: r.steps.as_deref().map(plan_tree::settle_steps),
                    is_loading: false,
                    ..r.clone()
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResourceRegistry {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}
