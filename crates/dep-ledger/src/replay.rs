use dep_diff::apply_diff;
use dep_store::{ControlDir, Namespace};
use dep_types::{ChangeEntry, ChangeSet, CommitHash, FileMap};
use tracing::{debug, warn};

use crate::error::LedgerError;

/// Result of replaying a branch into a file map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub branch: String,
    /// Commits whose change-sets were applied.
    pub applied: u64,
    /// Manifest entries whose commit object was missing.
    pub skipped: u64,
    pub state: FileMap,
}

/// Deterministic replay of branch history.
pub struct ReplayEngine;

impl ReplayEngine {
    /// Reconstruct the files of `branch` as of `target`.
    ///
    /// Replay starts from the root snapshot. With `target = None` no commits
    /// are applied. Otherwise commits are applied in manifest order up to and
    /// including `target`; a target absent from the manifest applies the
    /// whole branch.
    pub fn materialize(
        control: &ControlDir,
        branch: &str,
        target: Option<&CommitHash>,
    ) -> Result<ReplayResult, LedgerError> {
        let state = control.read_root()?.to_file_map();
        let Some(target) = target else {
            return Ok(ReplayResult {
                branch: branch.to_string(),
                applied: 0,
                skipped: 0,
                state,
            });
        };

        let manifest = control
            .read_manifest(Namespace::Local, branch)?
            .unwrap_or_default();
        Self::replay(control, branch, &manifest.commits, Some(target), state)
    }

    /// Reconstruct the files at the branch's newest commit.
    pub fn materialize_tip(control: &ControlDir, branch: &str) -> Result<ReplayResult, LedgerError> {
        let manifest = control
            .read_manifest(Namespace::Local, branch)?
            .unwrap_or_default();
        let state = control.read_root()?.to_file_map();
        match manifest.last() {
            Some(tip) => Self::replay(control, branch, &manifest.commits, Some(tip), state),
            None => Ok(ReplayResult {
                branch: branch.to_string(),
                applied: 0,
                skipped: 0,
                state,
            }),
        }
    }

    fn replay(
        control: &ControlDir,
        branch: &str,
        commits: &[CommitHash],
        target: Option<&CommitHash>,
        mut state: FileMap,
    ) -> Result<ReplayResult, LedgerError> {
        let mut applied = 0u64;
        let mut skipped = 0u64;

        for hash in commits {
            match control.read_commit(Namespace::Local, branch, hash)? {
                Some(commit) => {
                    apply_change_set(&mut state, &commit.changes);
                    applied += 1;
                }
                None => {
                    warn!(branch, hash = %hash, "commit object missing, skipped during replay");
                    skipped += 1;
                }
            }
            if Some(hash) == target {
                break;
            }
        }

        debug!(branch, applied, skipped, files = state.len(), "materialized branch");
        Ok(ReplayResult {
            branch: branch.to_string(),
            applied,
            skipped,
            state,
        })
    }
}

/// Apply every entry of a change-set to `state`.
pub fn apply_change_set(state: &mut FileMap, changes: &ChangeSet) {
    for (path, entry) in changes {
        match entry {
            ChangeEntry::DeleteFile => {
                state.remove(path);
            }
            _ => {
                let previous = state.get(path).map(String::as_str);
                if let Some(next) = apply_diff(previous, entry) {
                    state.insert(path.clone(), next);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::record_commit;
    use dep_crypto::SequenceHasher;
    use dep_diff::compute_diff;
    use dep_types::{BranchManifest, RepoPointer, RootFile, RootManifest, Stage};

    fn repo_with_root(files: &[(&str, &str)]) -> (tempfile::TempDir, ControlDir) {
        let tmp = tempfile::tempdir().unwrap();
        let control = ControlDir::create(tmp.path()).unwrap();
        control.write_pointer(&RepoPointer::default()).unwrap();
        control
            .write_root(&RootManifest {
                files: files
                    .iter()
                    .map(|(p, c)| RootFile {
                        path: p.to_string(),
                        content: c.to_string(),
                    })
                    .collect(),
            })
            .unwrap();
        control
            .write_manifest(Namespace::Local, "main", &BranchManifest::new())
            .unwrap();
        (tmp, control)
    }

    fn commit(control: &ControlDir, hasher: &SequenceHasher, changes: &[(&str, ChangeEntry)]) -> CommitHash {
        let mut stage = Stage::new();
        for (path, entry) in changes {
            stage.insert(*path, entry.clone());
        }
        control.write_stage(&stage).unwrap();
        record_commit(control, hasher, "c", 0).unwrap().hash
    }

    #[test]
    fn none_target_is_root_snapshot() {
        let (_tmp, control) = repo_with_root(&[("a", "root")]);
        let hasher = SequenceHasher::new();
        commit(&control, &hasher, &[("a", ChangeEntry::create("changed"))]);

        let result = ReplayEngine::materialize(&control, "main", None).unwrap();
        assert_eq!(result.applied, 0);
        assert_eq!(result.state.get("a").map(String::as_str), Some("root"));
    }

    #[test]
    fn replay_stops_after_target() {
        let (_tmp, control) = repo_with_root(&[("a", "v0")]);
        let hasher = SequenceHasher::new();
        let c1 = commit(&control, &hasher, &[("a", compute_diff(Some("v0"), "v1"))]);
        let _c2 = commit(&control, &hasher, &[("a", compute_diff(Some("v1"), "v2"))]);

        let at_c1 = ReplayEngine::materialize(&control, "main", Some(&c1)).unwrap();
        assert_eq!(at_c1.applied, 1);
        assert_eq!(at_c1.state.get("a").map(String::as_str), Some("v1"));

        let tip = ReplayEngine::materialize_tip(&control, "main").unwrap();
        assert_eq!(tip.applied, 2);
        assert_eq!(tip.state.get("a").map(String::as_str), Some("v2"));
    }

    #[test]
    fn unknown_target_applies_everything() {
        let (_tmp, control) = repo_with_root(&[]);
        let hasher = SequenceHasher::new();
        commit(&control, &hasher, &[("a", ChangeEntry::create("x"))]);
        commit(&control, &hasher, &[("b", ChangeEntry::create("y"))]);

        let ghost = CommitHash::parse("ffff").unwrap();
        let result = ReplayEngine::materialize(&control, "main", Some(&ghost)).unwrap();
        assert_eq!(result.applied, 2);
        assert_eq!(result.state.len(), 2);
    }

    #[test]
    fn create_delete_and_edit_semantics() {
        let (_tmp, control) = repo_with_root(&[("keep", "k"), ("drop", "d")]);
        let hasher = SequenceHasher::new();
        commit(
            &control,
            &hasher,
            &[
                ("drop", ChangeEntry::DeleteFile),
                ("new", ChangeEntry::create("n")),
                ("keep", compute_diff(Some("k"), "kept")),
                ("fresh", compute_diff(Some(""), "from nothing")),
            ],
        );

        let state = ReplayEngine::materialize_tip(&control, "main").unwrap().state;
        assert!(!state.contains_key("drop"));
        assert_eq!(state.get("new").map(String::as_str), Some("n"));
        assert_eq!(state.get("keep").map(String::as_str), Some("kept"));
        assert_eq!(state.get("fresh").map(String::as_str), Some("from nothing"));
    }

    #[test]
    fn missing_objects_are_skipped() {
        let (_tmp, control) = repo_with_root(&[]);
        let hasher = SequenceHasher::new();
        let c1 = commit(&control, &hasher, &[("a", ChangeEntry::create("x"))]);
        commit(&control, &hasher, &[("b", ChangeEntry::create("y"))]);
        std::fs::remove_file(control.commit_path(Namespace::Local, "main", &c1)).unwrap();

        let result = ReplayEngine::materialize_tip(&control, "main").unwrap();
        assert_eq!(result.applied, 1);
        assert_eq!(result.skipped, 1);
        assert!(!result.state.contains_key("a"));
        assert!(result.state.contains_key("b"));
    }

    #[test]
    fn replay_is_deterministic() {
        let (_tmp, control) = repo_with_root(&[("a", "base")]);
        let hasher = SequenceHasher::new();
        commit(&control, &hasher, &[("a", compute_diff(Some("base"), "based on"))]);
        commit(&control, &hasher, &[("b", ChangeEntry::create("b"))]);

        let first = ReplayEngine::materialize_tip(&control, "main").unwrap();
        let second = ReplayEngine::materialize_tip(&control, "main").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_branch_is_root() {
        let (_tmp, control) = repo_with_root(&[("a", "1")]);
        let result = ReplayEngine::materialize_tip(&control, "nope").unwrap();
        assert_eq!(result.state.len(), 1);
    }
}
