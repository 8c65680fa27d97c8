//! Change-sets: the payload of commits, the stage, and stash entries.
//!
//! A change-set maps a file path to exactly one [`ChangeEntry`]. On disk an
//! entry is either a tagged object (`{"type":"createFile",...}`,
//! `{"type":"deleteFile"}`) or a bare array of edit operations. In memory it
//! is a closed enum so every consumer matches exhaustively.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A materialized file tree: relative path → full text content.
pub type FileMap = BTreeMap<String, String>;

/// Ordered path → change mapping. Ordering keeps serialization (and thus
/// commit hashing) deterministic.
pub type ChangeSet = BTreeMap<String, ChangeEntry>;

/// One file transformation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireChange", into = "WireChange")]
pub enum ChangeEntry {
    /// File set to exactly this content.
    CreateFile { content: String },
    /// File removed.
    DeleteFile,
    /// Character-offset edits applied in order against the prior content.
    Edit(Vec<EditOp>),
}

impl ChangeEntry {
    /// Shorthand for a whole-file replacement.
    pub fn create(content: impl Into<String>) -> Self {
        Self::CreateFile {
            content: content.into(),
        }
    }

    /// Returns `true` for an edit list with no operations.
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Edit(ops) if ops.is_empty())
    }
}

/// A single text-offset edit.
///
/// Positions and lengths count UTF-16 code units, not bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditOp {
    /// Splice `content` in at `position`.
    Insert { position: usize, content: String },
    /// Remove `length` code units starting at `position`.
    Delete { position: usize, length: usize },
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireChange {
    Edit(Vec<EditOp>),
    Whole(WholeFile),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
enum WholeFile {
    #[serde(rename = "createFile", alias = "update")]
    CreateFile {
        #[serde(default)]
        content: String,
    },
    #[serde(rename = "deleteFile")]
    DeleteFile,
}

impl From<WireChange> for ChangeEntry {
    fn from(wire: WireChange) -> Self {
        match wire {
            WireChange::Edit(ops) => Self::Edit(ops),
            WireChange::Whole(WholeFile::CreateFile { content }) => Self::CreateFile { content },
            WireChange::Whole(WholeFile::DeleteFile) => Self::DeleteFile,
        }
    }
}

impl From<ChangeEntry> for WireChange {
    fn from(entry: ChangeEntry) -> Self {
        match entry {
            ChangeEntry::Edit(ops) => Self::Edit(ops),
            ChangeEntry::CreateFile { content } => Self::Whole(WholeFile::CreateFile { content }),
            ChangeEntry::DeleteFile => Self::Whole(WholeFile::DeleteFile),
        }
    }
}

/// The pending change-set (`stage.json`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default)]
    pub changes: ChangeSet,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn insert(&mut self, path: impl Into<String>, entry: ChangeEntry) {
        self.changes.insert(path.into(), entry);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.changes.contains_key(path)
    }
}

impl From<ChangeSet> for Stage {
    fn from(changes: ChangeSet) -> Self {
        Self { changes }
    }
}

/// A stashed change-set (`cache/stash_<ms>.json`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashEntry {
    #[serde(default)]
    pub changes: ChangeSet,
}

impl From<ChangeSet> for StashEntry {
    fn from(changes: ChangeSet) -> Self {
        Self { changes }
    }
}
