use dep_store::{ControlDir, Namespace};
use dep_types::CommitHash;
use tracing::info;

use crate::checkout::{current_state, switch_from};
use crate::error::{IndexError, IndexResult};

/// Result of a reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetOutcome {
    /// No commit was given; only the stage was discarded.
    StageCleared,
    /// The active branch now ends at `hash`.
    Moved {
        hash: CommitHash,
        /// Manifest entries dropped after `hash`.
        dropped: usize,
    },
}

/// Discard the stage and, when a commit is given, move the active branch
/// back to it.
///
/// The stage is cleared before the commit is looked up, so a failed lookup
/// still leaves the stage empty. Commits after `hash` are removed from the
/// manifest; their objects stay on disk. The working tree is then
/// force-checked out, deleting files only the dropped commits added.
pub fn reset(control: &ControlDir, hash: Option<&str>) -> IndexResult<ResetOutcome> {
    control.clear_stage()?;
    let Some(raw) = hash else {
        return Ok(ResetOutcome::StageCleared);
    };

    let not_found = || IndexError::CommitNotFound(raw.to_string());
    let hash = CommitHash::parse(raw).map_err(|_| not_found())?;

    let mut pointer = control.read_pointer()?;
    let branch = pointer.active.branch.clone();
    if !control.has_commit(Namespace::Local, &branch, &hash) {
        return Err(not_found());
    }

    // The tree still reflects the old parent; capture it before moving.
    let previous = current_state(control)?;

    pointer.active.parent = Some(hash.clone());
    control.write_pointer(&pointer)?;

    let mut manifest = control
        .read_manifest(Namespace::Local, &branch)?
        .unwrap_or_default();
    let before = manifest.len();
    if manifest.truncate_after(&hash) {
        control.write_manifest(Namespace::Local, &branch, &manifest)?;
    }
    let dropped = before - manifest.len();

    switch_from(control, &branch, &previous)?;
    info!(branch = %branch, hash = %hash, dropped, "reset branch");
    Ok(ResetOutcome::Moved { hash, dropped })
}
