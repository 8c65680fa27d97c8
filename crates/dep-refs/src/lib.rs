//! Branch management for dep.
//!
//! A branch is a directory under `history/local/` holding an ordered
//! manifest of commit hashes plus a private copy of every commit object it
//! references. Branching copies; nothing is shared between branches, so a
//! branch can be deleted without touching any other.
//!
//! # Modules
//!
//! - [`error`] -- Error types for branch operations
//! - [`names`] -- Branch name validation
//! - [`graph`] -- [`BranchGraph`]: create, delete, list

pub mod error;
pub mod graph;
pub mod names;

pub use error::{RefError, Result};
pub use graph::BranchGraph;
pub use names::validate_branch_name;
