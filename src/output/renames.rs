//! Target-name replacement from synthesis options
//!
//! Plugin options may rename individual targets (per-task overrides) and the
//! atomized CI targets (`ci` / `ci--FooTest` get the configured prefix).
//! Applied after synthesis, before the node is assembled, so the serialized
//! report already carries the orchestrator-facing names. Rewriting `:test`
//! references to the CI aggregate in CI environments stays the orchestrator's
//! concern.

use crate::config::SynthesisOptions;
use crate::output::schema::{TargetDependency, TargetGroups, Targets};

fn renamed(task_name: &str, options: &SynthesisOptions) -> Option<String> {
    if task_name.starts_with("ci") {
        let ci_name = options.ci_target_name.as_deref()?;
        return Some(task_name.replacen("ci", ci_name, 1));
    }
    options.target_name_overrides.get(task_name).cloned()
}

/// Applies target-name overrides to a synthesized target map.
pub fn apply_target_name_overrides(targets: Targets, options: &SynthesisOptions) -> Targets {
    targets
        .into_iter()
        .map(|(task_name, mut target)| {
            let Some(new_name) = renamed(&task_name, options) else {
                return (task_name, target);
            };

            // The renamed aggregate records its coarse-grained fallback and
            // re-points its fan-out references at the renamed units.
            if Some(new_name.as_str()) == options.ci_target_name.as_deref() {
                target.metadata.non_atomized_target = Some(options.test_target_name.clone());
                if let Some(depends_on) = &mut target.depends_on {
                    for dep in depends_on {
                        if let TargetDependency::Fanout { target: dep_target, .. } = dep {
                            if let Some(renamed_dep) = renamed(dep_target, options) {
                                *dep_target = renamed_dep;
                            }
                        }
                    }
                }
            }

            (new_name, target)
        })
        .collect()
}

/// Applies the same renames to every target group in place.
pub fn apply_group_name_overrides(target_groups: &mut TargetGroups, options: &SynthesisOptions) {
    for group in target_groups.values_mut() {
        for name in group.iter_mut() {
            if let Some(new_name) = renamed(name, options) {
                *name = new_name;
            }
        }
    }
}
