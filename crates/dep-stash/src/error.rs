use dep_index::IndexError;
use dep_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum StashError {
    #[error("no stash entries found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

pub type StashResult<T> = Result<T, StashError>;
