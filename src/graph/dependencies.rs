//! Inter-project dependency edge collection
//!
//! Edges come from three sources: resolved dependency configurations that
//! point at other workspace projects, direct subproject relationships, and
//! composite/included builds. All are collapsed into one structurally
//! deduplicated set; a failed configuration contributes zero edges without
//! suppressing the rest.
//!
//! Project references are matched by identity (project directory), not by
//! name, so unrelated projects that happen to share a name across included
//! builds never produce false edges.

use crate::host::{ProjectModel, ProjectRef, ResolvedDependency};
use crate::output::schema::Dependency;
use std::collections::BTreeSet;
use tracing::info;

/// Dependency configurations considered relevant for project graph edges.
const RELEVANT_CONFIGURATIONS: &[&str] = &["compileClasspath", "implementationDependenciesMetadata"];

fn edge(model: &ProjectModel, target_dir: &str) -> Dependency {
    Dependency {
        source: model.project_dir.clone(),
        target: target_dir.to_string(),
        source_file: model.build_file.clone(),
    }
}

/// Collects the dependency edges of one project.
pub fn build_dependencies(model: &ProjectModel, all_projects: &[ProjectRef]) -> BTreeSet<Dependency> {
    let mut dependencies = BTreeSet::new();

    for config in &model.configurations {
        if !RELEVANT_CONFIGURATIONS.contains(&config.name.as_str()) {
            continue;
        }
        if let Some(err) = &config.error {
            info!(
                project = %model.name,
                configuration = %config.name,
                error = %err,
                "configuration failed to resolve, contributing no edges"
            );
            continue;
        }
        for resolved in &config.resolved {
            let ResolvedDependency::Project { project_dir, .. } = resolved else {
                continue;
            };
            let known = all_projects.iter().any(|p| p.project_dir == *project_dir);
            if known {
                dependencies.insert(edge(model, project_dir));
            }
        }
    }

    for child in &model.subprojects {
        dependencies.insert(edge(model, &child.project_dir));
    }

    for included in &model.included_builds {
        dependencies.insert(edge(model, &included.project_dir));
    }

    dependencies
}
