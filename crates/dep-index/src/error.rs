//! Error types for the index crate.

use std::path::PathBuf;

use dep_ledger::LedgerError;
use dep_store::StoreError;

/// Errors that can occur during working-directory operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The path is neither on disk nor tracked, or lies outside the
    /// working tree.
    #[error("path not found: {0}")]
    PathNotFound(String),

    /// The working directory differs from the active commit.
    #[error("uncommitted changes in the working directory; commit or stash them first")]
    UncommittedChanges,

    #[error("branch not found: {0}")]
    BranchNotFound(String),

    #[error("commit not found: {0}")]
    CommitNotFound(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl IndexError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
