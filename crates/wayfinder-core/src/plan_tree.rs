//! Identity-keyed updates over a plan's step tree.
//!
//! A plan is a list of [`PlanItem`]s; every step reachable from it (single
//! items, group members, and sub-steps at any depth) is addressed by its
//! identity. Identities are unique, so at most one step matches a lookup.

use crate::models::{Group, PlanItem, Step, StepPatch};

/// Rebuild `plan` with the step identified by `target_id` shallow-merged
/// with `patch`.
///
/// Untouched steps are cloned unchanged. If no step matches, the result is
/// equal to the input. Applying the same patch twice gives the same plan as
/// applying it once.
///
/// # Examples
///
/// ```rust
/// use wayfinder_core::models::{PlanItem, Step, StepPatch};
/// use wayfinder_core::plan_tree::{find_step, replace_step};
///
/// let plan = vec![PlanItem::Single(Step::new("s1", "Knead", vec![]))];
/// let plan = replace_step(&plan, "s1", &StepPatch::loading(true));
///
/// assert!(find_step(&plan, "s1").unwrap().is_loading);
/// ```
pub fn replace_step(plan: &[PlanItem], target_id: &str, patch: &StepPatch) -> Vec<PlanItem> {
    plan.iter()
        .map(|item| match item {
            PlanItem::Single(step) => PlanItem::Single(replace_in_step(step, target_id, patch)),
            PlanItem::Parallel(group) => PlanItem::Parallel(Group {
                id: group.id.clone(),
                steps: replace_in_steps(&group.steps, target_id, patch),
            }),
        })
        .collect()
}

/// Same as [`replace_step`] for a flat list of steps (e.g. a resource's
/// acquisition plan).
pub fn replace_in_steps(steps: &[Step], target_id: &str, patch: &StepPatch) -> Vec<Step> {
    steps
        .iter()
        .map(|step| replace_in_step(step, target_id, patch))
        .collect()
}

fn replace_in_step(step: &Step, target_id: &str, patch: &StepPatch) -> Step {
    if step.id == target_id {
        return patch.apply(step);
    }
    match &step.sub_steps {
        Some(children) => Step {
            sub_steps: Some(replace_in_steps(children, target_id, patch)),
            ..step.clone()
        },
        None => step.clone(),
    }
}

/// Clear the loading flag on every step in a flat list and its sub-steps.
///
/// Used when the expansions that set those flags can no longer land.
pub fn settle_steps(steps: &[Step]) -> Vec<Step> {
    steps
        .iter()
        .map(|step| Step {
            sub_steps: step.sub_steps.as_deref().map(settle_steps),
            is_loading: false,
            ..step.clone()
        })
        .collect()
}

/// Find a step by identity anywhere in `plan`.
pub fn find_step<'a>(plan: &'a [PlanItem], target_id: &str) -> Option<&'a Step> {
    plan.iter()
        .find_map(|item| find_in_steps(item.steps(), target_id))
}

/// Find a step by identity anywhere in a flat step list and its sub-steps.
pub fn find_in_steps<'a>(steps: &'a [Step], target_id: &str) -> Option<&'a Step> {
    steps.iter().find_map(|step| {
        if step.id == target_id {
            Some(step)
        } else {
            step.sub_steps
                .as_deref()
                .and_then(|children| find_in_steps(children, target_id))
        }
    })
}

/// Every resource mention in `plan`, in plan order, depth first.
pub fn resource_mentions(plan: &[PlanItem]) -> Vec<String> {
    let mut mentions = Vec::new();
    for item in plan {
        collect_mentions(item.steps(), &mut mentions);
    }
    mentions
}

/// Every resource mention in a flat step list and its sub-steps.
pub fn steps_mentions(steps: &[Step]) -> Vec<String> {
    let mut mentions = Vec::new();
    collect_mentions(steps, &mut mentions);
    mentions
}

fn collect_mentions(steps: &[Step], out: &mut Vec<String>) {
    for step in steps {
        out.extend(step.resources.iter().cloned());
        if let Some(children) = &step.sub_steps {
            collect_mentions(children, out);
        }
    }
}

/// Total number of steps in `plan`, counting every depth.
pub fn step_count(plan: &[PlanItem]) -> usize {
    fn count(steps: &[Step]) -> usize {
        steps
            .iter()
            .map(|s| 1 + s.sub_steps.as_deref().map_or(0, count))
            .sum()
    }
    plan.iter().map(|item| count(item.steps())).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str) -> Step {
        Step::new(id, format!("do {id}"), vec![format!("res-{id}")])
    }

    fn nested(id: &str, children: Vec<Step>) -> Step {
        Step {
            sub_steps: Some(children),
            is_expanded: true,
            ..step(id)
        }
    }

    /// s1, group(g1: s2, s3[s3a[s3a1]]), s4
    fn sample_plan() -> Vec<PlanItem> {
        vec![
            PlanItem::Single(step("s1")),
            PlanItem::Parallel(Group {
                id: "g1".to_string(),
                steps: vec![
                    step("s2"),
                    nested("s3", vec![nested("s3a", vec![step("s3a1")])]),
                ],
            }),
            PlanItem::Single(step("s4")),
        ]
    }

    #[test]
    fn test_replace_top_level_single() {
        let plan = sample_plan();
        let patched = replace_step(&plan, "s1", &StepPatch::loading(true));

        assert!(find_step(&patched, "s1").unwrap().is_loading);
        assert_eq!(patched[1..], plan[1..]);
    }

    #[test]
    fn test_replace_at_every_depth_touches_exactly_one_step() {
        let plan = sample_plan();
        let ids = ["s1", "s2", "s3", "s3a", "s3a1", "s4"];
        let patch = StepPatch::loading(true);
        for id in ids {
            let patched = replace_step(&plan, id, &patch);

            assert_eq!(step_count(&patched), step_count(&plan));
            for other in ids {
                let before = find_step(&plan, other).unwrap();
                let after = find_step(&patched, other).unwrap();
                if other == id {
                    assert_eq!(after, &patch.apply(before), "{id} should be patched");
                } else if before.sub_steps.as_deref().and_then(|c| find_in_steps(c, id)).is_some() {
                    // Ancestors differ only in the rebuilt path below them
                    let expected = replace_in_steps(std::slice::from_ref(before), id, &patch);
                    assert_eq!(after, &expected[0], "{other} changed beyond {id}");
                    assert_eq!(after.instruction, before.instruction);
                    assert_eq!(after.is_loading, before.is_loading);
                } else {
                    assert_eq!(after, before, "{other} changed when patching {id}");
                }
            }
        }
    }

    #[test]
    fn test_settle_clears_loading_at_every_depth() {
        let plan = replace_step(&sample_plan(), "s3a1", &StepPatch::loading(true));
        let plan = replace_step(&plan, "s1", &StepPatch::loading(true));
        let steps: Vec<Step> = plan.iter().flat_map(|item| item.steps().to_vec()).collect();

        let settled = settle_steps(&steps);

        assert_eq!(settled.len(), steps.len());
        assert!(!find_in_steps(&settled, "s1").unwrap().is_loading);
        assert!(!find_in_steps(&settled, "s3a1").unwrap().is_loading);
        assert_eq!(
            find_in_steps(&settled, "s3a1").unwrap().instruction,
            find_in_steps(&steps, "s3a1").unwrap().instruction
        );
    }

    #[test]
    fn test_replace_deepest_step_rebuilds_ancestors() {
        let plan = sample_plan();
        let patched = replace_step(
            &plan,
            "s3a1",
            &StepPatch::expansion_loaded(vec![step("s3a1x")]),
        );

        let deepest = find_step(&patched, "s3a1").unwrap();
        assert!(deepest.is_expanded);
        assert_eq!(deepest.sub_steps.as_ref().unwrap()[0].id, "s3a1x");
        assert!(find_step(&patched, "s3a1x").is_some());
        assert!(find_step(&plan, "s3a1x").is_none());
    }

    #[test]
    fn test_replace_missing_id_is_noop() {
        let plan = sample_plan();
        let patched = replace_step(&plan, "nope", &StepPatch::expanded(true));
        assert_eq!(patched, plan);
    }

    #[test]
    fn test_replace_is_idempotent() {
        let plan = sample_plan();
        let patch = StepPatch::expansion_loaded(vec![step("new")]);
        let once = replace_step(&plan, "s2", &patch);
        let twice = replace_step(&once, "s2", &patch);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unbounded_depth() {
        let mut chain = step("d50");
        for depth in (0..50).rev() {
            chain = nested(&format!("d{depth}"), vec![chain]);
        }
        let plan = vec![PlanItem::Single(chain)];

        let patched = replace_step(&plan, "d50", &StepPatch::expanded(true));
        assert!(find_step(&patched, "d50").unwrap().is_expanded);
        assert!(!find_step(&plan, "d50").unwrap().is_expanded);
    }

    #[test]
    fn test_resource_mentions_in_plan_order() {
        let mentions = resource_mentions(&sample_plan());
        assert_eq!(
            mentions,
            vec!["res-s1", "res-s2", "res-s3", "res-s3a", "res-s3a1", "res-s4"]
        );
    }
}
