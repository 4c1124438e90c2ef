//! Target synthesis: one host task becomes one target record
//!
//! Cache and parallelism are fixed policy decisions, not derived from the
//! task: every synthesized target is cacheable and serialized, because the
//! host build tool owns its own intra-build parallelism and double-running it
//! corrupts shared state under `.gradle/`.
//!
//! Each synthesis step is isolated: a failure in one degrades that field to
//! absent and the rest of the target still comes out. A `Target` is always
//! returned.

use crate::graph::external::{is_resolved_artifact, resolve_external};
use crate::graph::paths::{normalize, relative_cwd, PathResolution};
use crate::host::{TaskDependencyRef, TaskModel};
use crate::output::schema::{
    ExternalNode, HelpMetadata, Target, TargetDependency, TargetInput, TargetMetadata,
    TargetOptions,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Arguments appended to every synthesized invocation to speed up repeated
/// runs under the orchestrator.
const PERFORMANCE_ARGS: &str = "--configuration-cache --parallel --build-cache";

/// Environment of one project's target synthesis, captured once per run.
pub struct TargetContext<'a> {
    pub project_name: &'a str,
    pub project_root: &'a str,
    pub workspace_root: &'a str,
    /// The invoking process's working directory
    pub cwd: &'a str,
}

/// The host build tool's script launcher, decided once from the operating
/// system the process reports.
pub fn launcher_command() -> &'static str {
    if cfg!(windows) {
        ".\\gradlew.bat"
    } else {
        "./gradlew"
    }
}

/// Converts one host task into a target record.
pub fn synthesize_target(
    task: &TaskModel,
    project_build_path: &str,
    ctx: &TargetContext<'_>,
    external_nodes: &mut BTreeMap<String, ExternalNode>,
) -> Target {
    debug!(task = %task.name, project = %ctx.project_name, "synthesizing target");
    let launcher = launcher_command();

    Target {
        cache: true,
        parallelism: false,
        inputs: collect_inputs(task, ctx, external_nodes),
        outputs: collect_outputs(task, ctx),
        depends_on: collect_depends_on(task, ctx.project_name),
        command: Some(format!("{launcher} {project_build_path}:{}", task.name)),
        executor: None,
        metadata: task_metadata(
            task.description
                .clone()
                .unwrap_or_else(|| format!("Run {}", task.name)),
            project_build_path,
            &task.name,
        ),
        options: Some(TargetOptions {
            cwd: relative_cwd(ctx.cwd, ctx.workspace_root),
            args: Some(PERFORMANCE_ARGS.to_string()),
        }),
    }
}

/// Builds target metadata: description, technology tag, and the help lookup
/// command for this task.
pub fn task_metadata(description: String, project_build_path: &str, task_name: &str) -> TargetMetadata {
    let launcher = launcher_command();
    TargetMetadata {
        description: Some(description),
        technologies: vec!["gradle".to_string()],
        help: HelpMetadata {
            command: format!("{launcher} help --task {project_build_path}:{task_name}"),
        },
        non_atomized_target: None,
    }
}

/// Normalizes declared input files; workspace-external artifact paths are
/// routed through external dependency resolution and accumulated into a
/// single trailing `externalDependencies` entry. Absent when nothing
/// survives.
fn collect_inputs(
    task: &TaskModel,
    ctx: &TargetContext<'_>,
    external_nodes: &mut BTreeMap<String, ExternalNode>,
) -> Option<Vec<TargetInput>> {
    let mut inputs: Vec<TargetInput> = Vec::new();
    let mut external_deps: Vec<String> = Vec::new();

    for path in &task.inputs {
        match normalize(path, ctx.project_root, ctx.workspace_root) {
            PathResolution::Inside(mapped) => inputs.push(TargetInput::Path(mapped)),
            PathResolution::External if is_resolved_artifact(path) => {
                match resolve_external(path, external_nodes) {
                    Ok(key) => external_deps.push(key),
                    Err(err) => {
                        info!(task = %task.name, error = %err, "dropping unparseable artifact path");
                    }
                }
            }
            PathResolution::External => {
                debug!(task = %task.name, path = %path, "skipping workspace-external input");
            }
        }
    }

    if !external_deps.is_empty() {
        inputs.push(TargetInput::ExternalDependencies {
            external_dependencies: external_deps,
        });
    }

    if inputs.is_empty() {
        None
    } else {
        Some(inputs)
    }
}

/// Normalizes declared output files; outputs outside the workspace are not
/// tracked. Absent when empty.
fn collect_outputs(task: &TaskModel, ctx: &TargetContext<'_>) -> Option<Vec<String>> {
    let outputs: Vec<String> = task
        .outputs
        .iter()
        .filter_map(|path| normalize(path, ctx.project_root, ctx.workspace_root).into_inside())
        .collect();

    if outputs.is_empty() {
        None
    } else {
        Some(outputs)
    }
}

/// Represents task-level dependency edges as `"project:task"` references.
/// Raw same-project names get qualified with the owning project; qualified
/// paths pass through. Absent when empty.
fn collect_depends_on(task: &TaskModel, project_name: &str) -> Option<Vec<TargetDependency>> {
    let deps: Vec<TargetDependency> = task
        .depends_on
        .iter()
        .map(|dep| match dep {
            TaskDependencyRef::Resolved { project, task } => {
                TargetDependency::Task(format!("{project}:{task}"))
            }
            TaskDependencyRef::Path(path) if path.contains(':') => {
                TargetDependency::Task(path.clone())
            }
            TaskDependencyRef::Path(name) => {
                TargetDependency::Task(format!("{project_name}:{name}"))
            }
        })
        .collect();

    if deps.is_empty() {
        None
    } else {
        Some(deps)
    }
}
