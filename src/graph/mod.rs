//! Project graph synthesis
//!
//! The core algorithm: converting an introspected host model into the
//! serializable project graph fragment. Leaves first - path normalization
//! and external dependency resolution feed target synthesis, target
//! synthesis and CI atomization feed the per-project node, dependency edges
//! are collected independently, and the whole per-project step is memoized
//! behind the report cache.

pub mod cache;
pub mod ci;
pub mod dependencies;
pub mod external;
pub mod paths;
pub mod synthesize;
pub mod target;

pub use cache::ReportCache;
pub use synthesize::{synthesize_project, synthesize_workspace};
