use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error(transparent)]
    Store(#[from] dep_store::StoreError),

    #[error(transparent)]
    Ledger(#[from] dep_ledger::LedgerError),

    #[error(transparent)]
    Ref(#[from] dep_refs::RefError),

    #[error(transparent)]
    Index(#[from] dep_index::IndexError),

    #[error(transparent)]
    Merge(#[from] dep_merge::MergeError),

    #[error(transparent)]
    Stash(#[from] dep_stash::StashError),

    #[error(transparent)]
    Sync(#[from] dep_sync::SyncError),
}

pub type SdkResult<T> = Result<T, SdkError>;
