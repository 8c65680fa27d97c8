use std::path::PathBuf;

/// Errors from control-directory operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No control directory at the given root.
    #[error("not a dep repository: {0}")]
    RepositoryNotFound(PathBuf),

    /// `init` on a directory that already has a control directory.
    #[error("repository already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted document could not be encoded or decoded.
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
