//! Snapshot-backed host implementation
//!
//! The orchestrator obtains the host model by running a small init script in
//! the Gradle build that dumps the fully configured project/task model to a
//! JSON snapshot. [`SnapshotHost`] serves that snapshot through the
//! [`BuildHost`] trait.

use super::{BuildHost, ProjectModel, ProjectRef};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;

/// A frozen dump of every project in a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub workspace_root: String,
    pub projects: Vec<ProjectModel>,
}

/// Serves a [`WorkspaceSnapshot`] as a [`BuildHost`].
///
/// Projects are keyed by their directory. Names are not unique across
/// included builds, so they cannot serve as lookup keys.
#[derive(Debug)]
pub struct SnapshotHost {
    workspace_root: String,
    // Host order of project identities is preserved separately; the map is
    // for lookup by directory.
    order: Vec<ProjectRef>,
    projects: HashMap<String, ProjectModel>,
}

impl SnapshotHost {
    pub fn new(snapshot: WorkspaceSnapshot) -> Result<Self> {
        let order: Vec<ProjectRef> = snapshot
            .projects
            .iter()
            .map(|p| ProjectRef {
                name: p.name.clone(),
                project_dir: p.project_dir.clone(),
            })
            .collect();
        let mut projects = HashMap::with_capacity(snapshot.projects.len());
        for model in snapshot.projects {
            if let Some(previous) = projects.insert(model.project_dir.clone(), model) {
                bail!(
                    "snapshot declares two projects at '{}' (first named '{}')",
                    previous.project_dir,
                    previous.name
                );
            }
        }
        Ok(Self {
            workspace_root: snapshot.workspace_root,
            order,
            projects,
        })
    }

    /// Loads a snapshot from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
        let snapshot: WorkspaceSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse snapshot file {}", path.display()))?;
        Self::new(snapshot)
    }

    fn project(&self, project: &ProjectRef) -> Result<&ProjectModel> {
        self.projects.get(&project.project_dir).ok_or_else(|| {
            anyhow!(
                "project '{}' ({}) not present in snapshot",
                project.name,
                project.project_dir
            )
        })
    }
}

impl BuildHost for SnapshotHost {
    fn workspace_root(&self) -> &str {
        &self.workspace_root
    }

    fn project_refs(&self) -> Vec<ProjectRef> {
        self.order.clone()
    }

    fn fingerprint(&self, project: &ProjectRef) -> Result<String> {
        let model = self.project(project)?;
        let serialized =
            serde_json::to_vec(model).context("failed to serialize project model for hashing")?;
        let mut hasher = Sha256::new();
        hasher.update(&serialized);
        Ok(hex::encode(hasher.finalize()))
    }

    fn project_model(&self, project: &ProjectRef) -> Result<ProjectModel> {
        self.project(project).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> WorkspaceSnapshot {
        serde_json::from_str(
            r#"{
                "workspaceRoot": "/ws",
                "projects": [
                    {
                        "name": "app",
                        "projectDir": "/ws/app",
                        "buildFile": "/ws/app/build.gradle",
                        "buildTreePath": ":app",
                        "tasks": [
                            {"name": "build", "inputs": ["/ws/app/src/Main.kt"], "outputs": []}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    fn app_ref() -> ProjectRef {
        ProjectRef {
            name: "app".to_string(),
            project_dir: "/ws/app".to_string(),
        }
    }

    #[test]
    fn test_snapshot_host_serves_projects_in_order() {
        let host = SnapshotHost::new(snapshot()).unwrap();
        assert_eq!(host.workspace_root(), "/ws");
        let refs = host.project_refs();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "app");
        assert_eq!(refs[0].project_dir, "/ws/app");
        let model = host.project_model(&app_ref()).unwrap();
        assert_eq!(model.build_tree_path, ":app");
        assert_eq!(model.tasks.len(), 1);
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        let host = SnapshotHost::new(snapshot()).unwrap();
        let first = host.fingerprint(&app_ref()).unwrap();
        let second = host.fingerprint(&app_ref()).unwrap();
        assert_eq!(first, second);

        let mut changed = snapshot();
        changed.projects[0].tasks[0].inputs.push("/ws/app/src/Other.kt".to_string());
        let changed_host = SnapshotHost::new(changed).unwrap();
        assert_ne!(first, changed_host.fingerprint(&app_ref()).unwrap());
    }

    #[test]
    fn test_unknown_project_is_an_error() {
        let host = SnapshotHost::new(snapshot()).unwrap();
        let ghost = ProjectRef {
            name: "nope".to_string(),
            project_dir: "/ws/nope".to_string(),
        };
        assert!(host.project_model(&ghost).is_err());
        assert!(host.fingerprint(&ghost).is_err());
    }

    #[test]
    fn test_same_name_distinct_dirs_both_served() {
        let mut s = snapshot();
        let mut included = s.projects[0].clone();
        included.project_dir = "/ws/included/app".to_string();
        included.build_file = "/ws/included/app/build.gradle".to_string();
        s.projects.push(included);

        let host = SnapshotHost::new(s).unwrap();
        let refs = host.project_refs();
        assert_eq!(refs.len(), 2);
        assert_eq!(
            host.project_model(&refs[0]).unwrap().project_dir,
            "/ws/app"
        );
        assert_eq!(
            host.project_model(&refs[1]).unwrap().project_dir,
            "/ws/included/app"
        );
    }

    #[test]
    fn test_duplicate_project_dir_is_rejected() {
        let mut s = snapshot();
        let twin = s.projects[0].clone();
        s.projects.push(twin);

        let err = SnapshotHost::new(s).unwrap_err();
        assert!(err.to_string().contains("/ws/app"));
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, serde_json::to_string(&snapshot()).unwrap()).unwrap();

        let host = SnapshotHost::from_file(&path).unwrap();
        assert_eq!(host.project_refs()[0].name, "app");
    }
}
