//! Diff engine for dep.
//!
//! Two independent views of a file change:
//!
//! - [`compute_diff`] / [`apply_diff`]: the storage format. A single-hunk
//!   text edit script (prefix/suffix trim) that replays exactly.
//! - [`diff_text`]: a line-oriented display diff with context, used only
//!   for human-facing output.
//!
//! # Key Types
//!
//! - [`TextDiff`] / [`DiffHunk`] / [`DiffLine`] -- Line-level display diff

pub mod char_diff;
pub mod text_diff;

pub use char_diff::{apply_diff, apply_edits, compute_diff};
pub use text_diff::{diff_text, DiffHunk, DiffLine, TextDiff};
