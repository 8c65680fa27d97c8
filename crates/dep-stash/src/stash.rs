use dep_diff::{apply_diff, compute_diff};
use dep_index::{checkout, current_state, workdir};
use dep_store::ControlDir;
use dep_types::{format_local_time, ChangeEntry, ChangeSet, StashEntry};
use tracing::{debug, info};

use crate::error::{StashError, StashResult};

const PREFIX: &str = "stash_";

/// Result of [`push`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StashOutcome {
    /// The working directory matched the active commit; nothing was saved.
    Clean,
    Saved { name: String, changes: usize },
}

/// A listed stash entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StashInfo {
    /// `N` in `stash@{N}`; the newest entry is 0.
    pub index: usize,
    pub name: String,
    /// Epoch milliseconds embedded in the name.
    pub timestamp: Option<u64>,
    /// `timestamp` rendered in local time.
    pub date: Option<String>,
}

impl StashInfo {
    pub fn label(&self) -> String {
        format!("stash@{{{}}}", self.index)
    }
}

/// What [`pop`] restored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopReport {
    pub name: String,
    pub written: Vec<String>,
    pub deleted: Vec<String>,
}

/// Save every uncommitted working-directory change and revert the tree.
///
/// Each on-disk file is diffed against the active commit; tracked files
/// missing on disk are recorded as deletions. When anything changed, the
/// entry is written, the stage is discarded and the active branch is
/// force-checked out.
pub fn push(control: &ControlDir, now_ms: u64) -> StashResult<StashOutcome> {
    let tracked = current_state(control)?;
    let on_disk = workdir::scan(control.root())?;

    let mut changes = ChangeSet::new();
    for (path, content) in &on_disk {
        let previous = tracked.get(path).map(String::as_str);
        if previous == Some(content.as_str()) {
            continue;
        }
        changes.insert(path.clone(), compute_diff(previous, content));
    }
    for path in tracked.keys().filter(|p| !on_disk.contains_key(*p)) {
        changes.insert(path.clone(), ChangeEntry::DeleteFile);
    }

    if changes.is_empty() {
        debug!("nothing to stash");
        return Ok(StashOutcome::Clean);
    }

    let mut stamp = now_ms;
    while control.stash_exists(&stash_name(stamp)) {
        stamp += 1;
    }
    let name = stash_name(stamp);
    let count = changes.len();
    control.write_stash(&name, &StashEntry::from(changes))?;

    control.clear_stage()?;
    let branch = control.read_pointer()?.active.branch;
    checkout(control, &branch, true)?;

    info!(name = %name, changes = count, "saved stash");
    Ok(StashOutcome::Saved {
        name,
        changes: count,
    })
}

/// Apply the newest stash entry to the working directory and delete it.
///
/// Whole-file entries are applied directly; edit lists are applied against
/// what is on disk now (empty if the file is missing).
pub fn pop(control: &ControlDir) -> StashResult<PopReport> {
    let name = control
        .list_stashes()?
        .pop()
        .ok_or(StashError::NotFound)?;
    let entry = control.read_stash(&name)?.ok_or(StashError::NotFound)?;

    let root = control.root();
    let mut report = PopReport {
        name: name.clone(),
        written: Vec::new(),
        deleted: Vec::new(),
    };

    for (path, change) in &entry.changes {
        let on_disk = match change {
            ChangeEntry::Edit(_) => workdir::read_text(root, path)?,
            _ => None,
        };
        match apply_diff(on_disk.as_deref(), change) {
            Some(content) => {
                workdir::write_text(root, path, &content)?;
                report.written.push(path.clone());
            }
            None => {
                workdir::remove(root, path)?;
                report.deleted.push(path.clone());
            }
        }
    }

    control.remove_stash(&name)?;
    info!(name = %name, written = report.written.len(), deleted = report.deleted.len(), "popped stash");
    Ok(report)
}

/// Stash entries, oldest first.
pub fn list(control: &ControlDir) -> StashResult<Vec<StashInfo>> {
    let names = control.list_stashes()?;
    let total = names.len();

    Ok(names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let timestamp = name.strip_prefix(PREFIX).and_then(|ms| ms.parse().ok());
            StashInfo {
                index: total - 1 - i,
                date: timestamp.and_then(format_local_time),
                timestamp,
                name,
            }
        })
        .collect())
}

fn stash_name(ms: u64) -> String {
    format!("{PREFIX}{ms}")
}
