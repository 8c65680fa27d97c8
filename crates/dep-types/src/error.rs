use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid commit hash {0:?}: expected lowercase hex")]
    InvalidHash(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
