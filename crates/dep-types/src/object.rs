use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Content-addressed identifier for a commit.
///
/// A `CommitHash` is the hex digest of a commit's serialized change-set,
/// timestamp and message. It doubles as the commit's storage key: the object
/// lives at `<branch>/<hash>.json`, so only hex digits are ever accepted.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitHash(String);

impl CommitHash {
    /// Build a hash from raw digest bytes.
    pub fn from_digest(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parse a user- or wire-supplied hash string.
    ///
    /// Uppercase input is normalized to lowercase. Anything that is not a
    /// non-empty run of hex digits is rejected, which also keeps the value
    /// safe to use as a file name.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidHash(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// The full hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in human-facing output (first 7 characters).
    pub fn short(&self) -> &str {
        let end = self.0.len().min(7);
        &self.0[..end]
    }

    /// File name of the commit object inside a branch directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Debug for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitHash({})", self.short())
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CommitHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CommitHash {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CommitHash> for String {
    fn from(hash: CommitHash) -> Self {
        hash.0
    }
}
