//! Stash store for dep.
//!
//! A stash entry is the full delta between the working directory and the
//! active commit, saved under `cache/stash_<epoch-ms>.json`. Pushing saves
//! the delta and reverts the working tree; popping replays the newest entry
//! onto the working tree and deletes it.
//!
//! # Key Types
//!
//! - [`StashOutcome`] -- Whether a push saved anything
//! - [`StashInfo`] -- One listed entry (`stash@{N}`)
//! - [`PopReport`] -- Which paths a pop touched

pub mod error;
pub mod stash;

pub use error::{StashError, StashResult};
pub use stash::{list, pop, push, PopReport, StashInfo, StashOutcome};
