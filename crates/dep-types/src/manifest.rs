use serde::{Deserialize, Serialize};

use crate::change::FileMap;
use crate::object::CommitHash;

/// The root snapshot captured at `init` (`root/manifest.json`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootManifest {
    #[serde(default)]
    pub files: Vec<RootFile>,
}

/// One file in the root snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootFile {
    pub path: String,
    pub content: String,
}

impl RootManifest {
    /// The snapshot as a path → content map. Later duplicates win.
    pub fn to_file_map(&self) -> FileMap {
        self.files
            .iter()
            .map(|f| (f.path.clone(), f.content.clone()))
            .collect()
    }
}

impl From<&FileMap> for RootManifest {
    fn from(files: &FileMap) -> Self {
        Self {
            files: files
                .iter()
                .map(|(path, content)| RootFile {
                    path: path.clone(),
                    content: content.clone(),
                })
                .collect(),
        }
    }
}

/// A branch's ordered, append-only commit list (oldest first).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchManifest {
    #[serde(default)]
    pub commits: Vec<CommitHash>,
}

impl BranchManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent commit, if any.
    pub fn last(&self) -> Option<&CommitHash> {
        self.commits.last()
    }

    pub fn contains(&self, hash: &CommitHash) -> bool {
        self.commits.contains(hash)
    }

    pub fn position(&self, hash: &CommitHash) -> Option<usize> {
        self.commits.iter().position(|h| h == hash)
    }

    pub fn push(&mut self, hash: CommitHash) {
        self.commits.push(hash);
    }

    /// Drop every commit after `hash`. Returns `false` (and leaves the list
    /// untouched) when `hash` is not present.
    pub fn truncate_after(&mut self, hash: &CommitHash) -> bool {
        match self.position(hash) {
            Some(index) => {
                self.commits.truncate(index + 1);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}
