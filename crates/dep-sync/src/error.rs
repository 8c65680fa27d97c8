use std::path::PathBuf;

use dep_index::IndexError;
use dep_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote URL not configured; use `dep remote <url|handle/repo>`")]
    NoRemote,

    #[error("invalid remote {0:?}: expected .../<handle>/<repo>")]
    InvalidRemote(String),

    #[error("invalid slug {0:?}: expected <handle>/<repo>")]
    InvalidSlug(String),

    #[error("remote error ({status}): {message}")]
    RemoteError { status: u16, message: String },

    #[error("remote returned commit {got} when asked for {expected}")]
    HashMismatch { expected: String, got: String },

    #[error("uncommitted changes in the working directory; commit or stash them first")]
    UncommittedChanges,

    #[error("destination path already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("transport error: {0}")]
    TransportError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

pub type SyncResult<T> = Result<T, SyncError>;
