use dep_index::IndexError;
use dep_ledger::LedgerError;
use dep_store::StoreError;

/// Errors from merge operations.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

pub type MergeResult<T> = Result<T, MergeError>;
