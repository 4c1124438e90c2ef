//! Report schema and post-processing

pub mod renames;
pub mod schema;
