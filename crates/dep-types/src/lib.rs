//! Foundation types for dep.
//!
//! This crate provides the data model shared by every other dep crate. All
//! types here serialize to the JSON shapes found inside a repository's `.dep/`
//! control directory.
//!
//! # Key Types
//!
//! - [`CommitHash`] -- Content-addressed commit identifier (lowercase hex)
//! - [`ChangeEntry`] / [`EditOp`] -- One file transformation inside a change-set
//! - [`ChangeSet`] -- Ordered path → [`ChangeEntry`] mapping
//! - [`Commit`] -- Immutable commit object
//! - [`RootManifest`] / [`BranchManifest`] -- Root snapshot and branch history lists
//! - [`RepoPointer`] -- The `dep.json` pointer (active branch, remote, configuration)
//! - [`Stage`] / [`StashEntry`] -- Pending and stashed change-sets
//! - [`FileMap`] -- A materialized path → content mapping

pub mod change;
pub mod commit;
pub mod error;
pub mod manifest;
pub mod object;
pub mod pointer;
pub mod time;

pub use change::{ChangeEntry, ChangeSet, EditOp, FileMap, Stage, StashEntry};
pub use commit::Commit;
pub use error::TypeError;
pub use manifest::{BranchManifest, RootFile, RootManifest};
pub use object::CommitHash;
pub use pointer::{ActiveRef, Configuration, RepoPointer, DEFAULT_BRANCH};
pub use time::format_local_time;
