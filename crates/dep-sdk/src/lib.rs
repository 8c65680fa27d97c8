//! High-level SDK for dep.
//!
//! [`Repository`] wraps a repository's control directory and exposes every
//! operation (staging, commits, branches, merge, stash, reset and sync)
//! as a method. This is the entry point for the CLI and for applications
//! embedding dep.

pub mod error;
pub mod repository;

pub use error::{SdkError, SdkResult};
pub use repository::{DiffReport, FileDiff, Repository};

// Re-export key types
pub use dep_diff::{DiffHunk, DiffLine, TextDiff};
pub use dep_index::{CheckoutReport, FileStatus, ResetOutcome, StatusEntry, WorkdirStatus};
pub use dep_merge::MergeReport;
pub use dep_stash::{PopReport, StashInfo, StashOutcome};
pub use dep_sync::{CloneResult, FetchResult, PullResult, PushResult};
pub use dep_types::{format_local_time, Commit, CommitHash, DEFAULT_BRANCH};
