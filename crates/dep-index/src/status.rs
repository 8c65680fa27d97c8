//! Working directory status.
//!
//! Compares the files on disk against the state at the active commit and
//! against the stage.

use dep_store::ControlDir;
use dep_types::{ChangeEntry, CommitHash};
use serde::{Deserialize, Serialize};

use crate::checkout::current_state;
use crate::error::IndexResult;
use crate::workdir;

/// Complete status of the working directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkdirStatus {
    pub branch: String,
    /// The commit the working directory is based on.
    pub parent: Option<CommitHash>,
    /// Paths in the stage, whether or not they are on disk.
    pub staged: Vec<StatusEntry>,
    /// Tracked, not staged, content differs from the active commit.
    pub modified: Vec<String>,
    /// On disk, not tracked, not staged.
    pub untracked: Vec<String>,
    /// Tracked, not staged, missing on disk.
    pub deleted: Vec<String>,
}

impl WorkdirStatus {
    /// Returns `true` if there are no changes of any kind.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty()
            && self.modified.is_empty()
            && self.untracked.is_empty()
            && self.deleted.is_empty()
    }

    pub fn has_staged_changes(&self) -> bool {
        !self.staged.is_empty()
    }
}

/// A staged path and the kind of change staged for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub path: String,
    pub status: FileStatus,
}

impl StatusEntry {
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// The kind of file change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    /// A file the active commit does not have.
    New,
    Modified,
    Deleted,
}

/// Compute the status of the working directory.
pub fn status(control: &ControlDir) -> IndexResult<WorkdirStatus> {
    let pointer = control.read_pointer()?;
    let tracked = current_state(control)?;
    let on_disk = workdir::scan(control.root())?;
    let stage = control.read_stage()?.unwrap_or_default();

    let mut out = WorkdirStatus {
        branch: pointer.active.branch,
        parent: pointer.active.parent,
        ..WorkdirStatus::default()
    };

    for (path, entry) in &stage.changes {
        let kind = match entry {
            ChangeEntry::DeleteFile => FileStatus::Deleted,
            _ if !tracked.contains_key(path) => FileStatus::New,
            _ => FileStatus::Modified,
        };
        out.staged.push(StatusEntry::new(path.clone(), kind));
    }

    for (path, content) in &on_disk {
        if stage.contains(path) {
            continue;
        }
        match tracked.get(path) {
            Some(known) if known != content => out.modified.push(path.clone()),
            Some(_) => {}
            None => out.untracked.push(path.clone()),
        }
    }

    out.deleted = tracked
        .keys()
        .filter(|p| !stage.contains(p.as_str()) && !on_disk.contains_key(*p))
        .cloned()
        .collect();

    Ok(out)
}

/// Whether the working directory differs from the active commit.
///
/// Untracked files count: they differ from "absent". The stage is not
/// consulted.
pub fn is_dirty(control: &ControlDir) -> IndexResult<bool> {
    let tracked = current_state(control)?;
    let on_disk = workdir::scan(control.root())?;

    let changed = on_disk
        .iter()
        .any(|(path, content)| tracked.get(path) != Some(content));
    let missing = tracked.keys().any(|path| !on_disk.contains_key(path));
    Ok(changed || missing)
}
