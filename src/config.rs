//! Synthesis options
//!
//! Options mirror what the orchestrator's plugin configuration exposes:
//! per-task target-name overrides and the names used for the atomized CI
//! targets. Options participate in the report cache key, so any change here
//! invalidates cached project nodes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Effective options of one synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthesisOptions {
    /// Name of the coarse-grained test target; recorded as the non-atomized
    /// fallback on a renamed aggregate.
    pub test_target_name: String,
    /// Replacement name for the atomized `ci` targets (`ci` becomes this,
    /// `ci--FooTest` gets the same prefix swap).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_target_name: Option<String>,
    /// Per-task target-name overrides, task name to target name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub target_name_overrides: BTreeMap<String, String>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            test_target_name: "test".to_string(),
            ci_target_name: None,
            target_name_overrides: BTreeMap::new(),
        }
    }
}

impl SynthesisOptions {
    /// Normalizes user-supplied options: blank names fall back to defaults.
    pub fn normalized(mut self) -> Self {
        if self.test_target_name.trim().is_empty() {
            self.test_target_name = "test".to_string();
        }
        if let Some(name) = &self.ci_target_name {
            if name.trim().is_empty() {
                self.ci_target_name = None;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SynthesisOptions::default();
        assert_eq!(options.test_target_name, "test");
        assert!(options.ci_target_name.is_none());
        assert!(options.target_name_overrides.is_empty());
    }

    #[test]
    fn test_normalized_restores_blank_names() {
        let options = SynthesisOptions {
            test_target_name: "  ".to_string(),
            ci_target_name: Some(String::new()),
            target_name_overrides: BTreeMap::new(),
        }
        .normalized();

        assert_eq!(options.test_target_name, "test");
        assert!(options.ci_target_name.is_none());
    }

    #[test]
    fn test_deserializes_from_partial_json() {
        let options: SynthesisOptions =
            serde_json::from_str(r#"{"ciTargetName": "test-ci"}"#).unwrap();
        assert_eq!(options.ci_target_name.as_deref(), Some("test-ci"));
        assert_eq!(options.test_target_name, "test");
    }
}
