use dep_index::{current_state, workdir};
use dep_ledger::ReplayEngine;
use dep_store::{ControlDir, Namespace};
use dep_types::{BranchManifest, ChangeEntry, CommitHash, Stage};
use tracing::{debug, info};

use crate::error::{MergeError, MergeResult};
use crate::plan::{plan_merge, Resolution};

/// What a merge did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeReport {
    pub target: String,
    /// Newest commit of the active branch that the target also has.
    pub ancestor: Option<CommitHash>,
    /// Paths taken from the target unchanged (including deletions).
    pub taken: Vec<String>,
    /// Paths replaced by a conflict block.
    pub conflicts: Vec<String>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn is_noop(&self) -> bool {
        self.taken.is_empty() && self.conflicts.is_empty()
    }
}

/// The newest commit of `active` that also appears in `target`.
pub fn common_ancestor(active: &BranchManifest, target: &BranchManifest) -> Option<CommitHash> {
    active
        .commits
        .iter()
        .rev()
        .find(|hash| target.contains(hash))
        .cloned()
}

/// Merge the tip of `target_branch` into the working directory.
///
/// The base is the common ancestor replayed on the active branch, or an
/// empty map when the branches share no commit. Every decided path is
/// written to disk and the stage is replaced with the result; nothing is
/// committed.
pub fn merge(control: &ControlDir, target_branch: &str) -> MergeResult<MergeReport> {
    let target_manifest = control
        .read_manifest(Namespace::Local, target_branch)?
        .ok_or_else(|| MergeError::BranchNotFound(target_branch.to_string()))?;

    let pointer = control.read_pointer()?;
    let active_branch = pointer.active.branch.as_str();
    let active_manifest = control
        .read_manifest(Namespace::Local, active_branch)?
        .unwrap_or_default();

    let ancestor = common_ancestor(&active_manifest, &target_manifest);
    debug!(active = active_branch, target = target_branch, ancestor = ?ancestor, "merge base");

    let base = match &ancestor {
        Some(hash) => ReplayEngine::materialize(control, active_branch, Some(hash))?.state,
        None => Default::default(),
    };
    let active = current_state(control)?;
    let target = ReplayEngine::materialize_tip(control, target_branch)?.state;

    let plan = plan_merge(&base, &active, &target, target_branch);

    let root = control.root();
    let mut stage = Stage::new();
    for (path, resolution) in &plan.entries {
        match resolution {
            Resolution::Take(Some(content)) | Resolution::Conflict(content) => {
                workdir::write_text(root, path, content)?;
                stage.insert(path.clone(), ChangeEntry::create(content.clone()));
            }
            Resolution::Take(None) => {
                workdir::remove(root, path)?;
                stage.insert(path.clone(), ChangeEntry::DeleteFile);
            }
        }
    }
    if !stage.is_empty() {
        control.write_stage(&stage)?;
    }

    let report = MergeReport {
        target: target_branch.to_string(),
        ancestor,
        taken: plan.taken().map(str::to_string).collect(),
        conflicts: plan.conflicts().map(str::to_string).collect(),
    };
    info!(
        target = target_branch,
        taken = report.taken.len(),
        conflicts = report.conflicts.len(),
        "merged branch"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dep_crypto::SequenceHasher;
    use dep_index::checkout;
    use dep_ledger::record_commit;
    use dep_refs::BranchGraph;
    use dep_types::{RepoPointer, RootManifest};

    struct Repo {
        _tmp: tempfile::TempDir,
        control: ControlDir,
        hasher: SequenceHasher,
    }

    impl Repo {
        fn new(files: &[(&str, &str)]) -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let control = ControlDir::create(tmp.path()).unwrap();
            let snapshot: dep_types::FileMap = files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect();
            for (p, c) in files {
                workdir::write_text(tmp.path(), p, c).unwrap();
            }
            control.write_root(&RootManifest::from(&snapshot)).unwrap();
            control
                .write_manifest(Namespace::Local, "main", &BranchManifest::new())
                .unwrap();
            control.write_pointer(&RepoPointer::default()).unwrap();
            Self {
                _tmp: tmp,
                control,
                hasher: SequenceHasher::new(),
            }
        }

        fn commit(&self, path: &str, content: &str) -> CommitHash {
            workdir::write_text(self.control.root(), path, content).unwrap();
            let mut stage = Stage::new();
            stage.insert(path, ChangeEntry::create(content));
            self.control.write_stage(&stage).unwrap();
            record_commit(&self.control, &self.hasher, "c", 0).unwrap().hash
        }

        fn read(&self, path: &str) -> Option<String> {
            workdir::read_text(self.control.root(), path).unwrap()
        }

        fn stage(&self) -> Stage {
            self.control.read_stage().unwrap().unwrap_or_default()
        }
    }

    #[test]
    fn ancestor_is_newest_shared_commit() {
        let h = |s: &str| CommitHash::parse(s).unwrap();
        let active = BranchManifest {
            commits: vec![h("01"), h("02"), h("0a")],
        };
        let target = BranchManifest {
            commits: vec![h("01"), h("02"), h("0b")],
        };
        assert_eq!(common_ancestor(&active, &target), Some(h("02")));
        assert_eq!(common_ancestor(&active, &BranchManifest::new()), None);
    }

    #[test]
    fn missing_target_branch() {
        let repo = Repo::new(&[]);
        assert!(matches!(
            merge(&repo.control, "ghost"),
            Err(MergeError::BranchNotFound(_))
        ));
    }

    #[test]
    fn clean_merge_takes_target_changes() {
        let repo = Repo::new(&[("f", "base")]);
        repo.commit("f", "v1");
        BranchGraph::new(&repo.control).create_branch("b", "main").unwrap();
        checkout(&repo.control, "b", false).unwrap();
        repo.commit("f", "v2");
        checkout(&repo.control, "main", false).unwrap();

        let report = merge(&repo.control, "b").unwrap();
        assert!(report.is_clean());
        assert_eq!(report.taken, vec!["f"]);
        assert_eq!(repo.read("f").as_deref(), Some("v2"));
        assert_eq!(
            repo.stage().changes.get("f"),
            Some(&ChangeEntry::create("v2"))
        );
    }

    #[test]
    fn divergent_edits_conflict() {
        let repo = Repo::new(&[]);
        repo.commit("f", "base");
        BranchGraph::new(&repo.control).create_branch("b", "main").unwrap();
        repo.commit("f", "A");
        checkout(&repo.control, "b", false).unwrap();
        repo.commit("f", "B");
        checkout(&repo.control, "main", false).unwrap();

        let report = merge(&repo.control, "b").unwrap();
        let expected = "<<<<<<< active\nA\n=======\nB\n>>>>>>> b";
        assert_eq!(report.conflicts, vec!["f"]);
        assert_eq!(repo.read("f").as_deref(), Some(expected));
        assert_eq!(
            repo.stage().changes.get("f"),
            Some(&ChangeEntry::create(expected))
        );
    }

    #[test]
    fn unrelated_histories_use_an_empty_base() {
        let repo = Repo::new(&[("f", "x")]);
        BranchGraph::new(&repo.control).create_branch("b", "main").unwrap();
        repo.commit("other", "o");
        checkout(&repo.control, "b", false).unwrap();

        let mut stage = Stage::new();
        stage.insert("f", ChangeEntry::DeleteFile);
        repo.control.write_stage(&stage).unwrap();
        workdir::remove(repo.control.root(), "f").unwrap();
        record_commit(&repo.control, &repo.hasher, "drop f", 0).unwrap();
        checkout(&repo.control, "main", false).unwrap();

        // With no shared commit, files only the active side has look like
        // active-side additions and are kept.
        let report = merge(&repo.control, "b").unwrap();
        assert_eq!(report.ancestor, None);
        assert!(report.is_noop());
        assert_eq!(repo.read("f").as_deref(), Some("x"));
    }

    #[test]
    fn shared_history_deletion_is_taken() {
        let repo = Repo::new(&[]);
        repo.commit("f", "x");
        BranchGraph::new(&repo.control).create_branch("b", "main").unwrap();
        checkout(&repo.control, "b", false).unwrap();

        let mut stage = Stage::new();
        stage.insert("f", ChangeEntry::DeleteFile);
        repo.control.write_stage(&stage).unwrap();
        workdir::remove(repo.control.root(), "f").unwrap();
        record_commit(&repo.control, &repo.hasher, "drop f", 0).unwrap();
        checkout(&repo.control, "main", false).unwrap();

        let report = merge(&repo.control, "b").unwrap();
        assert_eq!(report.taken, vec!["f"]);
        assert!(repo.read("f").is_none());
        assert_eq!(repo.stage().changes.get("f"), Some(&ChangeEntry::DeleteFile));
    }

    #[test]
    fn nothing_to_merge_leaves_stage_alone() {
        let repo = Repo::new(&[]);
        repo.commit("f", "x");
        BranchGraph::new(&repo.control).create_branch("b", "main").unwrap();

        let mut pending = Stage::new();
        pending.insert("keep", ChangeEntry::create("k"));
        repo.control.write_stage(&pending).unwrap();

        let report = merge(&repo.control, "b").unwrap();
        assert!(report.is_noop());
        assert_eq!(repo.stage(), pending);
    }
}
