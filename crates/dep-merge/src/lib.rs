//! Merge engine for dep.
//!
//! Implements three-way merge at file granularity: a file is either taken
//! whole from the target branch or replaced by a conflict block. No merge
//! commit is created; the result is written to the working directory and
//! the stage, and the user commits it.
//!
//! # Key Types
//!
//! - [`MergePlan`] / [`Resolution`] -- Pure per-path decisions over three file maps
//! - [`MergeReport`] -- What a merge did to the working directory

pub mod error;
pub mod merge;
pub mod plan;

pub use error::{MergeError, MergeResult};
pub use merge::{common_ancestor, merge, MergeReport};
pub use plan::{conflict_block, plan_merge, MergePlan, Resolution};
