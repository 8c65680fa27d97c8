use dep_store::StoreError;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("nothing to commit: the stage is empty")]
    EmptyStage,

    #[error("commit not found: {0}")]
    CommitNotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
