use serde::{Deserialize, Serialize};

use crate::change::ChangeSet;
use crate::object::CommitHash;

/// An immutable, content-addressed commit object.
///
/// `parent` is informational: it records the commit the working directory was
/// at when this commit was made. Branch membership comes from the branch
/// manifest, never from walking `parent` links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: CommitHash,
    pub message: String,
    /// Milliseconds since the UNIX epoch.
    pub timestamp: u64,
    pub parent: Option<CommitHash>,
    pub changes: ChangeSet,
}
