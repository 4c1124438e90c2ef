//! Host build tool introspection interface
//!
//! The host build tool (Gradle) owns the authoritative project/task model.
//! This module abstracts it behind the [`BuildHost`] capability trait so the
//! synthesis core never talks to a concrete API: any build tool exposing an
//! equivalent introspection surface - enumerable tasks, per-task file sets,
//! dependency-configuration resolution results - can be substituted, and
//! tests can swap in an in-memory host.
//!
//! The snapshot types here are a frozen, serde-loadable view taken at the
//! host's "all configuration complete" point. Synthesis transforms the
//! snapshot; it never mutates host state or re-resolves anything.

pub mod snapshot;

pub use snapshot::SnapshotHost;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Capability interface over the host build tool.
///
/// Projects are addressed by [`ProjectRef`] everywhere: names repeat across
/// included builds, so only the project directory is a usable key.
///
/// `fingerprint` must be cheap: it is consulted before `project_model` so a
/// report-cache hit skips the expensive introspection entirely.
pub trait BuildHost: Send + Sync {
    /// Absolute root of the workspace being introspected.
    fn workspace_root(&self) -> &str;

    /// Identity references of all projects in the workspace, in host order.
    /// Used both to enumerate the run and to match resolved project
    /// dependencies by identity.
    fn project_refs(&self) -> Vec<ProjectRef>;

    /// Content fingerprint of a project's build declaration. Any change to
    /// the build configuration must change the fingerprint.
    fn fingerprint(&self, project: &ProjectRef) -> Result<String>;

    /// Full introspection model for one project.
    fn project_model(&self, project: &ProjectRef) -> Result<ProjectModel>;
}

/// A reference to another project, carrying enough identity to distinguish
/// same-named projects from unrelated builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub name: String,
    /// Absolute project directory; this is the project's identity.
    pub project_dir: String,
}

/// One resolved entry of a dependency configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResolvedDependency {
    /// A reference to another workspace project.
    #[serde(rename_all = "camelCase")]
    Project { name: String, project_dir: String },
    /// A resolved third-party artifact on disk.
    Artifact { file: String },
}

/// Resolution result of one dependency configuration.
///
/// A host-side resolution failure is carried as `error`; such a
/// configuration contributes zero edges but never aborts synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationModel {
    pub name: String,
    #[serde(default)]
    pub resolved: Vec<ResolvedDependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A task-level dependency edge as the host declared it.
///
/// Hosts report edges in several shapes: a resolved reference to a task in a
/// known project, or a raw string path (`"compileJava"`, `"lib:jar"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskDependencyRef {
    Resolved { project: String, task: String },
    Path(String),
}

/// One host task: the unit a target is synthesized from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskModel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared source/input files, absolute paths in host order
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Declared output files, absolute paths
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub depends_on: Vec<TaskDependencyRef>,
}

/// Frozen introspection model of one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectModel {
    pub name: String,
    /// Absolute project directory (the project root)
    pub project_dir: String,
    /// Absolute path of the build declaration file
    pub build_file: String,
    /// Build-tree path, e.g. `:app` or `:utils:number-utils`; `:` for root
    pub build_tree_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskModel>,
    #[serde(default)]
    pub configurations: Vec<ConfigurationModel>,
    #[serde(default)]
    pub subprojects: Vec<ProjectRef>,
    #[serde(default)]
    pub included_builds: Vec<ProjectRef>,
}

impl ProjectModel {
    /// Build path usable as a task prefix: the root project's `:` collapses
    /// to the empty string so `{path}:{task}` never doubles the separator.
    pub fn project_build_path(&self) -> &str {
        self.build_tree_path.strip_suffix(':').unwrap_or(&self.build_tree_path)
    }
}
