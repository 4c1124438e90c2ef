//! Per-project synthesis pipeline and the parallel workspace run
//!
//! Each project is synthesized independently into an immutable per-project
//! report: targets (with CI atomization), dependency edges, and discovered
//! external nodes. The workspace run maps over all projects with a rayon
//! worker pool and folds the partials into one report; shared state is a
//! merge step over immutable partials rather than locks inside the synthesis
//! steps.
//!
//! A project-level failure degrades that project to an empty partial and is
//! logged; it never aborts the run. Only structural violations during the
//! final merge are hard errors.

use crate::config::SynthesisOptions;
use crate::graph::cache::{cache_key, ReportCache};
use crate::graph::ci::{add_test_ci_targets, TEST_COMPILE_PREFIX};
use crate::graph::dependencies::build_dependencies;
use crate::graph::target::{synthesize_target, TargetContext};
use crate::host::{BuildHost, ProjectModel, ProjectRef};
use crate::output::renames::{apply_group_name_overrides, apply_target_name_overrides};
use crate::output::schema::{
    ExternalNode, NodeMetadata, ProjectNode, Report, TargetGroups, Targets,
};
use anyhow::Result;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Synthesizes the whole workspace into one report.
pub fn synthesize_workspace(
    host: &dyn BuildHost,
    options: &SynthesisOptions,
    cache: &ReportCache,
) -> Result<Report> {
    let start = Instant::now();
    let projects = host.project_refs();
    info!(
        workspace_root = %host.workspace_root(),
        projects = projects.len(),
        "starting workspace synthesis"
    );

    let partials: Vec<Report> = projects
        .par_iter()
        .map(|project| synthesize_project(host, project, options, cache))
        .collect();

    let report = Report::aggregate(partials)?;
    info!(
        nodes = report.nodes.len(),
        dependencies = report.dependencies.len(),
        external_nodes = report.external_nodes.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "workspace synthesis complete"
    );
    Ok(report)
}

/// Synthesizes one project, consulting the report cache first.
///
/// On a cache hit the host is not introspected at all; on a miss the partial
/// is computed, stored, and returned. Failures yield an empty partial.
pub fn synthesize_project(
    host: &dyn BuildHost,
    project: &ProjectRef,
    options: &SynthesisOptions,
    cache: &ReportCache,
) -> Report {
    let key = match host.fingerprint(project) {
        Ok(fingerprint) => Some(cache_key(&project.project_dir, options, &fingerprint)),
        Err(err) => {
            warn!(project = %project.name, error = %err, "no fingerprint, synthesizing uncached");
            None
        }
    };

    if let Some(key) = &key {
        if let Some(cached) = cache.get(key) {
            debug!(project = %project.name, root = %project.project_dir, "report cache hit");
            return cached;
        }
    }

    let model = match host.project_model(project) {
        Ok(model) => model,
        Err(err) => {
            warn!(project = %project.name, error = %err, "introspection failed, project contributes no node");
            return Report::default();
        }
    };

    let partial = synthesize_model(&model, &host.project_refs(), host.workspace_root(), options);

    if let Some(key) = key {
        cache.put(key, partial.clone());
    }
    partial
}

/// Transforms one introspected model into its per-project partial report.
fn synthesize_model(
    model: &ProjectModel,
    all_projects: &[ProjectRef],
    workspace_root: &str,
    options: &SynthesisOptions,
) -> Report {
    info!(project = %model.name, tasks = model.tasks.len(), "processing targets");

    let dependencies = build_dependencies(model, all_projects);

    let mut targets = Targets::new();
    let mut target_groups = TargetGroups::new();
    let mut external_nodes: BTreeMap<String, ExternalNode> = BTreeMap::new();

    let cwd = process_cwd();
    let ctx = TargetContext {
        project_name: &model.name,
        project_root: &model.project_dir,
        workspace_root,
        cwd: &cwd,
    };
    let project_build_path = model.project_build_path();

    for task in &model.tasks {
        if let Some(group) = task.group.as_deref().filter(|g| !g.trim().is_empty()) {
            target_groups
                .entry(group.to_string())
                .or_default()
                .push(task.name.clone());
        }

        let target = synthesize_target(task, project_build_path, &ctx, &mut external_nodes);

        if task.name.starts_with(TEST_COMPILE_PREFIX) {
            add_test_ci_targets(
                &task.inputs,
                project_build_path,
                &target,
                &mut targets,
                &mut target_groups,
                &model.project_dir,
                workspace_root,
            );
        }

        targets.insert(task.name.clone(), target);
    }

    let targets = apply_target_name_overrides(targets, options);
    apply_group_name_overrides(&mut target_groups, options);

    let node = ProjectNode {
        targets,
        metadata: NodeMetadata {
            target_groups,
            technologies: vec!["gradle".to_string()],
            description: model.description.clone(),
        },
        name: model.name.clone(),
    };

    let mut nodes = BTreeMap::new();
    nodes.insert(model.project_dir.clone(), node);

    Report {
        nodes,
        dependencies,
        external_nodes,
    }
}

fn process_cwd() -> String {
    std::env::current_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| ".".to_string())
}
