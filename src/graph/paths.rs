//! Path normalization against project and workspace roots
//!
//! Targets must not leak absolute paths: the orchestrator hashes inputs and
//! outputs, and an absolute path would make the hash machine-specific. Paths
//! inside the workspace are rewritten to a symbolic root-relative form; paths
//! outside it are flagged so the caller can decide whether they denote a
//! third-party artifact.
//!
//! These are pure string-prefix functions. No separator cleanup or case
//! folding is applied - the remainder must survive byte-exact, because the
//! result feeds the cache key.

/// Result of classifying an absolute path against the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResolution {
    /// Path lies inside the workspace, rewritten to `{projectRoot}...` or
    /// `{workspaceRoot}...`.
    Inside(String),
    /// Path lies outside the workspace.
    External,
}

impl PathResolution {
    pub fn into_inside(self) -> Option<String> {
        match self {
            PathResolution::Inside(path) => Some(path),
            PathResolution::External => None,
        }
    }
}

/// Rewrites `path` to a root-relative symbolic form.
///
/// The project root is checked before the workspace root, so a path under
/// both resolves to `{projectRoot}`.
pub fn normalize(path: &str, project_root: &str, workspace_root: &str) -> PathResolution {
    if let Some(rest) = path.strip_prefix(project_root) {
        return PathResolution::Inside(format!("{{projectRoot}}{rest}"));
    }
    if let Some(rest) = path.strip_prefix(workspace_root) {
        return PathResolution::Inside(format!("{{workspaceRoot}}{rest}"));
    }
    PathResolution::External
}

/// Rewrites a working directory inside the workspace to `.`-relative form;
/// a cwd outside the workspace passes through unchanged.
pub fn relative_cwd(cwd: &str, workspace_root: &str) -> String {
    match cwd.strip_prefix(workspace_root) {
        Some(rest) => format!(".{rest}"),
        None => cwd.to_string(),
    }
}
