use dep_ledger::ReplayEngine;
use dep_store::{ControlDir, Namespace};
use dep_types::{CommitHash, FileMap};
use tracing::info;

use crate::error::{IndexError, IndexResult};
use crate::status::is_dirty;
use crate::workdir;

/// What a checkout did to the working tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutReport {
    pub branch: String,
    pub parent: Option<CommitHash>,
    /// Files written from the target state.
    pub written: usize,
    /// Tracked files deleted because the target does not have them.
    pub removed: usize,
}

/// The state the working directory should be in: the active branch
/// replayed up to the active commit.
pub fn current_state(control: &ControlDir) -> IndexResult<FileMap> {
    let pointer = control.read_pointer()?;
    let result = ReplayEngine::materialize(
        control,
        &pointer.active.branch,
        pointer.active.parent.as_ref(),
    )?;
    Ok(result.state)
}

/// Switch the working directory to the tip of `branch`.
///
/// Without `force`, refuses when the working directory is dirty. Files
/// tracked in the current state but absent from the target are deleted;
/// untracked files are left alone.
pub fn checkout(control: &ControlDir, branch: &str, force: bool) -> IndexResult<CheckoutReport> {
    if !control.branch_exists(Namespace::Local, branch) {
        return Err(IndexError::BranchNotFound(branch.to_string()));
    }
    if !force && is_dirty(control)? {
        return Err(IndexError::UncommittedChanges);
    }

    let current = current_state(control)?;
    switch_from(control, branch, &current)
}

/// Write the tip of `branch` over a working tree that reflects `current`,
/// then point the repository at that tip.
///
/// Paths in `current` that the tip lacks are deleted. Callers that move the
/// pointer before reconciling pass the state the tree held beforehand.
pub(crate) fn switch_from(
    control: &ControlDir,
    branch: &str,
    current: &FileMap,
) -> IndexResult<CheckoutReport> {
    let manifest = control
        .read_manifest(Namespace::Local, branch)?
        .unwrap_or_default();
    let target = ReplayEngine::materialize_tip(control, branch)?.state;

    let root = control.root();
    let mut removed = 0;
    for path in current.keys().filter(|p| !target.contains_key(*p)) {
        if workdir::remove(root, path)? {
            removed += 1;
        }
    }
    for (path, content) in &target {
        workdir::write_text(root, path, content)?;
    }

    let mut pointer = control.read_pointer()?;
    pointer.active.branch = branch.to_string();
    pointer.active.parent = manifest.last().cloned();
    control.write_pointer(&pointer)?;

    info!(branch, parent = ?pointer.active.parent, written = target.len(), removed, "checked out");
    Ok(CheckoutReport {
        branch: branch.to_string(),
        parent: pointer.active.parent,
        written: target.len(),
        removed,
    })
}
