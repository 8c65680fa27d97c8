//! Error types for branch operations.

use dep_store::StoreError;
use thiserror::Error;

/// Errors that can occur during branch operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// The branch name is not usable as a directory name.
    #[error("invalid branch name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("branch already exists: {name}")]
    AlreadyExists { name: String },

    #[error("branch not found: {name}")]
    NotFound { name: String },

    /// Cannot delete the currently checked-out branch.
    #[error("cannot delete the active branch: {name}")]
    InUse { name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for branch operations.
pub type Result<T> = std::result::Result<T, RefError>;
