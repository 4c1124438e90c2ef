//! Hash-keyed memoization of per-project synthesis
//!
//! The cache maps (project identity, effective options, content fingerprint)
//! to a previously synthesized per-project report. A hit skips introspection
//! and synthesis wholesale and reuses the entry verbatim; staleness is fully
//! determined by the key, never by time. Entries are immutable: a changed
//! fingerprint produces a new entry rather than a mutation.

use crate::config::SynthesisOptions;
use crate::output::schema::Report;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory report cache, shared across the parallel run.
///
/// Entries are written at most once per key per run, so a single mutex over
/// the map is enough.
#[derive(Debug, Default)]
pub struct ReportCache {
    entries: Mutex<HashMap<String, Report>>,
}

/// Computes the cache key for one project.
///
/// The options are hashed through their canonical JSON form; containers in
/// [`SynthesisOptions`] are ordered, so the serialization is stable.
pub fn cache_key(project_root: &str, options: &SynthesisOptions, fingerprint: &str) -> String {
    let options_json = serde_json::to_string(options).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(project_root.as_bytes());
    hasher.update([0]);
    hasher.update(options_json.as_bytes());
    hasher.update([0]);
    hasher.update(fingerprint.as_bytes());
    hex::encode(hasher.finalize())
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Report> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }

    pub fn put(&self, key: String, report: Report) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key, report);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(key, report);
            }
        }
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
