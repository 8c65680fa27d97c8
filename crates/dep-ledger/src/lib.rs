//! Append-only commit history for dep.
//!
//! This crate is the heart of dep. It provides:
//! - Commit creation from the stage, with a pluggable hash function
//! - Reverse-chronological history listing
//! - Deterministic replay of a branch into a file map, from the root
//!   snapshot up to any commit

pub mod commit;
pub mod error;
pub mod replay;

pub use commit::{log, record_commit};
pub use error::LedgerError;
pub use replay::{apply_change_set, ReplayEngine, ReplayResult};
