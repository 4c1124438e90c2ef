//! External dependency resolution
//!
//! A resolved artifact in the Gradle module cache encodes its coordinates in
//! the file path, five slash-delimited segments counted from the filename
//! backward:
//!
//! ```text
//! .../org.apache.commons/commons-lang3/3.13.0/b72632.../commons-lang3-3.13.0.jar
//!        group              artifact    version  hash       filename
//! ```
//!
//! That path is parsed into a stable external-node identifier plus metadata
//! and upserted into the run's registry. Re-deriving the same path always
//! yields the same key, so concurrent discovery of the same artifact from
//! different projects is harmless.

use crate::output::schema::{ExternalDepData, ExternalNode};
use anyhow::{bail, Result};
use std::collections::BTreeMap;

/// Provenance tag for nodes resolved from the Gradle artifact cache.
const NODE_TYPE: &str = "gradle";

/// Archive extensions worth attempting coordinate parsing for. Anything else
/// outside the workspace is treated as a plain external file and skipped.
const ARCHIVE_EXTENSIONS: &[&str] = &[".jar"];

/// Whether a workspace-external input file looks like a resolved artifact.
pub fn is_resolved_artifact(path: &str) -> bool {
    ARCHIVE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Parses `file_path` into an external node, upserts it into `registry`, and
/// returns its key for use inside a target's input list.
///
/// Fails when the path carries fewer than the five expected segments; the
/// caller drops that single candidate and continues.
pub fn resolve_external(
    file_path: &str,
    registry: &mut BTreeMap<String, ExternalNode>,
) -> Result<String> {
    let segments: Vec<&str> = file_path.split('/').collect();
    if segments.len() < 5 {
        bail!(
            "artifact path '{}' has fewer than five segments",
            file_path
        );
    }

    let filename = segments[segments.len() - 1];
    let base_name = match filename.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => filename,
    };
    let hash = segments[segments.len() - 2];
    let version = segments[segments.len() - 3];
    let artifact = segments[segments.len() - 4];
    let group = segments[segments.len() - 5];

    let key = format!("{NODE_TYPE}:{base_name}");
    let node = ExternalNode {
        node_type: NODE_TYPE.to_string(),
        name: key.clone(),
        data: ExternalDepData {
            version: Some(version.to_string()),
            package_name: format!("{group}.{artifact}"),
            hash: Some(hash.to_string()),
        },
    };
    registry.insert(key.clone(), node);
    Ok(key)
}
