use dep_crypto::HashFunction;
use dep_store::{ControlDir, Namespace};
use dep_types::Commit;
use tracing::{info, warn};

use crate::error::LedgerError;

/// Turn the stage into a commit on the active branch.
///
/// The hash covers the serialized change-set, the timestamp and the message.
/// The commit object is written first, then the manifest, then the pointer;
/// the stage is removed last.
pub fn record_commit(
    control: &ControlDir,
    hasher: &dyn HashFunction,
    message: &str,
    timestamp: u64,
) -> Result<Commit, LedgerError> {
    let mut pointer = control.read_pointer()?;
    let stage = control.read_stage()?.ok_or(LedgerError::EmptyStage)?;

    let encoded = serde_json::to_string(&stage.changes)
        .map_err(|e| LedgerError::Serialization(e.to_string()))?;
    let hash = hasher.hash(format!("{encoded}{timestamp}{message}").as_bytes());

    let branch = pointer.active.branch.clone();
    let commit = Commit {
        hash: hash.clone(),
        message: message.to_string(),
        timestamp,
        parent: pointer.active.parent.clone(),
        changes: stage.changes,
    };

    control.write_commit(Namespace::Local, &branch, &commit)?;

    let mut manifest = control
        .read_manifest(Namespace::Local, &branch)?
        .unwrap_or_default();
    manifest.push(hash.clone());
    control.write_manifest(Namespace::Local, &branch, &manifest)?;

    pointer.active.parent = Some(hash.clone());
    control.write_pointer(&pointer)?;
    control.clear_stage()?;

    info!(branch = %branch, hash = %hash, files = commit.changes.len(), "recorded commit");
    Ok(commit)
}

/// Commits on `branch`, newest first. Missing objects are skipped.
pub fn log(control: &ControlDir, branch: &str) -> Result<Vec<Commit>, LedgerError> {
    let manifest = control
        .read_manifest(Namespace::Local, branch)?
        .unwrap_or_default();

    let mut commits = Vec::with_capacity(manifest.len());
    for hash in manifest.commits.iter().rev() {
        match control.read_commit(Namespace::Local, branch, hash)? {
            Some(commit) => commits.push(commit),
            None => warn!(branch, hash = %hash, "commit object missing from history"),
        }
    }
    Ok(commits)
}
