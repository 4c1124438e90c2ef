//! Project graph report data structures
//!
//! This module defines the schema for the node report - the serializable
//! project graph fragment handed to the orchestrator. A report carries the
//! synthesized project nodes, the deduplicated inter-project dependency
//! edges, and the table of resolved external (third-party) artifacts.
//!
//! Field names follow the orchestrator's JSON contract (`dependsOn`,
//! `targetGroups`, `externalDependencies`, ...), so every struct here is
//! `camelCase`-renamed for serde.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;
use tracing::error;

/// Targets of a project, keyed by target name.
pub type Targets = BTreeMap<String, Target>;

/// Named, ordered buckets of target names used for discovery/UI grouping.
pub type TargetGroups = BTreeMap<String, Vec<String>>;

/// One cacheable, independently invocable unit of work derived from a host
/// task.
///
/// Optional fields are omitted from the serialized form entirely rather than
/// written as empty collections; the orchestrator treats absence and emptiness
/// differently when computing hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Whether the orchestrator may cache this target's outputs
    pub cache: bool,
    /// Whether the orchestrator may run this target in parallel with others
    pub parallelism: bool,
    /// Declared input files (root-relative) plus external dependency keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<TargetInput>>,
    /// Declared output files (root-relative); outputs outside the workspace
    /// are not tracked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<String>>,
    /// Task-level dependency edges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<TargetDependency>>,
    /// Invocation command; absent on no-op aggregate targets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Orchestrator executor override (e.g. "nx:noop" for aggregates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,
    /// Descriptive metadata shown in the orchestrator UI
    pub metadata: TargetMetadata,
    /// Invocation options (working directory, extra arguments)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<TargetOptions>,
}

/// One entry of a target's input list: either a normalized path, or the
/// single trailing bucket of external dependency keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetInput {
    Path(String),
    #[serde(rename_all = "camelCase")]
    ExternalDependencies { external_dependencies: Vec<String> },
}

/// One entry of a target's `dependsOn` list: a plain `"project:task"`
/// reference, or a structured fan-out descriptor produced by CI atomization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetDependency {
    Task(String),
    Fanout {
        target: String,
        projects: String,
        params: String,
    },
}

/// Descriptive metadata of a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub help: HelpMetadata,
    /// Name of the coarse-grained target an atomized aggregate replaces
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_atomized_target: Option<String>,
}

/// Help lookup for a target, surfaced by the orchestrator's `--help` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpMetadata {
    pub command: String,
}

/// Invocation options of a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetOptions {
    pub cwd: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}

/// Metadata of a project node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    pub target_groups: TargetGroups,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One synthesized project, keyed by its root path in [`Report::nodes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectNode {
    pub targets: Targets,
    pub metadata: NodeMetadata,
    pub name: String,
}

/// One inter-project (or project to included-build) edge.
///
/// Deduplicated by full structural equality inside a `BTreeSet`; the same
/// edge discovered via multiple configurations collapses to one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub source: String,
    pub target: String,
    pub source_file: String,
}

/// Resolved metadata of an external artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDepData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub package_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// A graph node representing a resolved third-party artifact rather than a
/// workspace project. Keyed by `name` (e.g. `gradle:commons-lang3-3.13.0`);
/// re-deriving the same artifact path always yields the same key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalNode {
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: String,
    pub data: ExternalDepData,
}

/// A project graph fragment.
///
/// The same shape serves both as the per-project partial result (one entry in
/// `nodes`) and as the merged workspace report the orchestrator consumes;
/// merging is [`Report::merge`]. All containers are ordered so serialization
/// is deterministic and therefore hashable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub nodes: BTreeMap<String, ProjectNode>,
    pub dependencies: BTreeSet<Dependency>,
    pub external_nodes: BTreeMap<String, ExternalNode>,
}

/// Structural violations surfaced by report aggregation.
///
/// Unlike per-field introspection failures, which degrade locally, these
/// indicate an invariant violation and abort the run.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("two projects share the root '{0}' in the merged report")]
    DuplicateProjectRoot(String),
    #[error("conflicting external node data for key '{0}'")]
    ExternalNodeConflict(String),
}

impl Report {
    /// Merges a per-project partial into this report.
    ///
    /// Dependency sets are unioned. Node maps are combined by project root; a
    /// collision is a hard error since two projects must never share a root.
    /// External nodes merge by key; rewriting a key with identical data is an
    /// idempotent no-op, while conflicting data at the same key is a
    /// consistency violation.
    pub fn merge(&mut self, part: Report) -> Result<(), AggregateError> {
        for (root, node) in part.nodes {
            if let Some(existing) = self.nodes.get(&root) {
                if *existing != node {
                    error!(root = %root, "duplicate project root with conflicting content");
                    return Err(AggregateError::DuplicateProjectRoot(root));
                }
                continue;
            }
            self.nodes.insert(root, node);
        }

        self.dependencies.extend(part.dependencies);

        for (key, node) in part.external_nodes {
            match self.external_nodes.get(&key) {
                Some(existing) if *existing != node => {
                    error!(key = %key, "conflicting external node data at the same key");
                    return Err(AggregateError::ExternalNodeConflict(key));
                }
                Some(_) => {}
                None => {
                    self.external_nodes.insert(key, node);
                }
            }
        }

        Ok(())
    }

    /// Assembles per-project partials into one report.
    pub fn aggregate(parts: impl IntoIterator<Item = Report>) -> Result<Report, AggregateError> {
        let mut report = Report::default();
        for part in parts {
            report.merge(part)?;
        }
        Ok(report)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project Graph Report")?;
        writeln!(f, "====================")?;
        writeln!(f, "Projects: {}", self.nodes.len())?;
        for (root, node) in &self.nodes {
            writeln!(f, "  {} ({} targets) at {}", node.name, node.targets.len(), root)?;
        }
        writeln!(f, "Dependencies: {}", self.dependencies.len())?;
        writeln!(f, "External nodes: {}", self.external_nodes.len())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str) -> ProjectNode {
        ProjectNode {
            targets: BTreeMap::new(),
            metadata: NodeMetadata {
                target_groups: BTreeMap::new(),
                technologies: vec!["gradle".to_string()],
                description: None,
            },
            name: name.to_string(),
        }
    }

    fn external(name: &str, version: &str) -> ExternalNode {
        ExternalNode {
            node_type: "gradle".to_string(),
            name: name.to_string(),
            data: ExternalDepData {
                version: Some(version.to_string()),
                package_name: "org.example.lib".to_string(),
                hash: None,
            },
        }
    }

    #[test]
    fn test_merge_unions_dependencies() {
        let dep = Dependency {
            source: "/ws/app".to_string(),
            target: "/ws/lib".to_string(),
            source_file: "/ws/app/build.gradle".to_string(),
        };
        let mut a = Report::default();
        a.dependencies.insert(dep.clone());
        let mut b = Report::default();
        b.dependencies.insert(dep);

        a.merge(b).unwrap();
        assert_eq!(a.dependencies.len(), 1);
    }

    #[test]
    fn test_merge_rejects_conflicting_roots() {
        let mut a = Report::default();
        a.nodes.insert("/ws/app".to_string(), node("app"));
        let mut b = Report::default();
        b.nodes.insert("/ws/app".to_string(), node("other"));

        let err = a.merge(b).unwrap_err();
        assert!(matches!(err, AggregateError::DuplicateProjectRoot(_)));
    }

    #[test]
    fn test_merge_accepts_identical_external_rewrite() {
        let mut a = Report::default();
        a.external_nodes
            .insert("gradle:lib-1.0".to_string(), external("gradle:lib-1.0", "1.0"));
        let mut b = Report::default();
        b.external_nodes
            .insert("gradle:lib-1.0".to_string(), external("gradle:lib-1.0", "1.0"));

        a.merge(b).unwrap();
        assert_eq!(a.external_nodes.len(), 1);
    }

    #[test]
    fn test_merge_rejects_conflicting_external_data() {
        let mut a = Report::default();
        a.external_nodes
            .insert("gradle:lib-1.0".to_string(), external("gradle:lib-1.0", "1.0"));
        let mut b = Report::default();
        b.external_nodes
            .insert("gradle:lib-1.0".to_string(), external("gradle:lib-1.0", "2.0"));

        let err = a.merge(b).unwrap_err();
        assert!(matches!(err, AggregateError::ExternalNodeConflict(_)));
    }

    #[test]
    fn test_target_serializes_camel_case_and_omits_absent_fields() {
        let target = Target {
            cache: true,
            parallelism: false,
            inputs: None,
            outputs: None,
            depends_on: Some(vec![TargetDependency::Task("app:classes".to_string())]),
            command: Some("./gradlew :app:build".to_string()),
            executor: None,
            metadata: TargetMetadata {
                description: Some("Run build".to_string()),
                technologies: vec!["gradle".to_string()],
                help: HelpMetadata {
                    command: "./gradlew help --task :app:build".to_string(),
                },
                non_atomized_target: None,
            },
            options: Some(TargetOptions {
                cwd: ".".to_string(),
                args: None,
            }),
        };

        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["dependsOn"][0], "app:classes");
        assert!(json.get("inputs").is_none());
        assert!(json.get("outputs").is_none());
        assert!(json.get("executor").is_none());
        assert!(json["options"].get("args").is_none());
    }

    #[test]
    fn test_external_dependencies_input_shape() {
        let input = TargetInput::ExternalDependencies {
            external_dependencies: vec!["gradle:commons-lang3-3.13.0".to_string()],
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["externalDependencies"][0], "gradle:commons-lang3-3.13.0");
    }

    #[test]
    fn test_report_roundtrip_is_deterministic() {
        let mut report = Report::default();
        report.nodes.insert("/ws/b".to_string(), node("b"));
        report.nodes.insert("/ws/a".to_string(), node("a"));

        let first = serde_json::to_string(&report).unwrap();
        let second = serde_json::to_string(&report).unwrap();
        assert_eq!(first, second);
        // BTreeMap keys serialize in sorted order
        assert!(first.find("/ws/a").unwrap() < first.find("/ws/b").unwrap());
    }
}
