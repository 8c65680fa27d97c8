//! Working-directory reconciliation for dep.
//!
//! Compares the files on disk with the state the repository pointer says
//! they should be in, maintains the stage between the working directory and
//! the next commit, and rewrites the working tree on checkout and reset.
//!
//! # Key Types
//!
//! - [`WorkdirStatus`] -- Result of status computation
//! - [`StatusEntry`] / [`FileStatus`] -- One staged path and its kind of change
//! - [`CheckoutReport`] -- What a checkout wrote and removed
//! - [`ResetOutcome`] -- Whether a reset moved the branch or only cleared the stage

pub mod checkout;
pub mod error;
pub mod init;
pub mod reset;
pub mod stage;
pub mod status;
pub mod workdir;

pub use checkout::{checkout, current_state, CheckoutReport};
pub use error::{IndexError, IndexResult};
pub use init::init;
pub use reset::{reset, ResetOutcome};
pub use stage::{add, rm};
pub use status::{is_dirty, status, FileStatus, StatusEntry, WorkdirStatus};

#[cfg(test)]
mod testutil;
