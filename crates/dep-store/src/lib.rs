//! Persistence for dep.
//!
//! Everything a repository knows lives under a single control directory
//! (`.dep/`) next to the working tree:
//!
//! ```text
//! .dep/
//!   dep.json                         repository pointer
//!   root/manifest.json               root snapshot
//!   history/local/<branch>/          manifest.json + <hash>.json commits
//!   history/remote/<branch>/         remote-tracking mirror
//!   stage.json                       pending change-set
//!   cache/stash_<epoch-ms>.json      stash entries
//! ```
//!
//! # Key Types
//!
//! - [`ControlDir`] -- typed access to every file in the layout
//! - [`Namespace`] -- local branches vs the remote-tracking mirror
//!
//! # Design Rules
//!
//! 1. Every file is JSON, pretty-printed with two-space indentation.
//! 2. Each write is atomic (temp file in the same directory, then rename).
//!    There is no multi-file transaction.
//! 3. A missing optional file reads as `None`, never as an error.
//! 4. The store never interprets change-sets; it only moves documents.

pub mod control;
pub mod error;
pub mod json;

pub use control::{ControlDir, Namespace, CONTROL_DIR};
pub use error::{StoreError, StoreResult};
pub use json::{read_json, write_json};
