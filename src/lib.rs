//! gradlegraph - project graph ingestion for Gradle workspaces
//!
//! This library converts a Gradle workspace's introspected project/task model
//! into a normalized, serializable project graph fragment: per-project nodes
//! with runnable targets, target groupings, inter-project dependency edges,
//! and resolved external (third-party) dependency nodes. A monorepo
//! orchestrator merges the resulting report with reports from other subtrees
//! to understand the whole workspace without re-implementing Gradle's
//! dependency resolution or task execution.
//!
//! # Core Concepts
//!
//! - **Host snapshot**: a frozen, serde-loadable view of the build tool's
//!   project model, served through the [`BuildHost`] capability trait so any
//!   build tool with an equivalent introspection surface can be substituted
//! - **Target**: one cacheable, independently invocable unit of work derived
//!   from a host task
//! - **CI atomization**: fanning a coarse test task out into one cacheable
//!   target per test class plus an aggregate entry point
//! - **Report cache**: hash-keyed memoization of per-project synthesis, so
//!   unchanged projects are never re-introspected
//!
//! # Example Usage
//!
//! ```no_run
//! use gradlegraph::{synthesize_workspace, ReportCache, SnapshotHost, SynthesisOptions};
//! use std::path::Path;
//!
//! fn ingest(snapshot: &Path) -> anyhow::Result<()> {
//!     let host = SnapshotHost::from_file(snapshot)?;
//!     let cache = ReportCache::new();
//!     let report = synthesize_workspace(&host, &SynthesisOptions::default(), &cache)?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`host`]: the build tool introspection interface and snapshot loading
//! - [`graph`]: the synthesis core (paths, externals, targets, CI
//!   atomization, dependencies, caching, the parallel run)
//! - [`output`]: the report schema and post-processing
//! - [`cli`]: the command-line surface
//! - [`util`]: logging setup

// Public modules
pub mod cli;
pub mod config;
pub mod graph;
pub mod host;
pub mod output;
pub mod util;

// Re-export key types for convenient access
pub use config::SynthesisOptions;
pub use graph::{synthesize_project, synthesize_workspace, ReportCache};
pub use host::{BuildHost, ProjectModel, ProjectRef, SnapshotHost};
pub use output::schema::{AggregateError, Dependency, ExternalNode, ProjectNode, Report, Target};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_gradlegraph() {
        assert_eq!(NAME, "gradlegraph");
    }
}
