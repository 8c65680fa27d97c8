use dep_store::{ControlDir, Namespace};
use dep_types::BranchManifest;
use tracing::{debug, info, warn};

use crate::error::{RefError, Result};
use crate::names::validate_branch_name;

/// Branch operations over a repository's control directory.
#[derive(Clone, Copy, Debug)]
pub struct BranchGraph<'a> {
    control: &'a ControlDir,
}

impl<'a> BranchGraph<'a> {
    pub fn new(control: &'a ControlDir) -> Self {
        Self { control }
    }

    /// Whether a local branch named `name` exists.
    pub fn exists(&self, name: &str) -> bool {
        self.control.branch_exists(Namespace::Local, name)
    }

    /// The manifest of a local branch.
    pub fn manifest(&self, name: &str) -> Result<BranchManifest> {
        self.control
            .read_manifest(Namespace::Local, name)?
            .ok_or_else(|| RefError::NotFound {
                name: name.to_string(),
            })
    }

    /// Create `name` as a copy of `from`.
    ///
    /// The new branch gets the same commit list and its own copy of every
    /// commit object the list references. Its manifest is also mirrored into
    /// the remote-tracking tree so a later push sees nothing as new.
    pub fn create_branch(&self, name: &str, from: &str) -> Result<BranchManifest> {
        validate_branch_name(name)?;
        if self.exists(name) {
            return Err(RefError::AlreadyExists {
                name: name.to_string(),
            });
        }

        let manifest = self.manifest(from)?;

        for hash in &manifest.commits {
            match self.control.read_commit(Namespace::Local, from, hash)? {
                Some(commit) => self.control.write_commit(Namespace::Local, name, &commit)?,
                None => warn!(branch = from, hash = %hash, "commit object missing, not copied"),
            }
        }

        self.control.write_manifest(Namespace::Local, name, &manifest)?;
        self.control.write_manifest(Namespace::Remote, name, &manifest)?;

        info!(branch = name, from, commits = manifest.len(), "created branch");
        Ok(manifest)
    }

    /// Delete `name` and its remote-tracking mirror.
    pub fn delete_branch(&self, name: &str, active: &str) -> Result<()> {
        if !self.exists(name) {
            return Err(RefError::NotFound {
                name: name.to_string(),
            });
        }
        if name == active {
            return Err(RefError::InUse {
                name: name.to_string(),
            });
        }

        self.control.remove_branch(Namespace::Local, name)?;
        let mirrored = self.control.remove_branch(Namespace::Remote, name)?;
        debug!(branch = name, mirrored, "deleted branch");
        Ok(())
    }

    /// Local branch names, sorted.
    pub fn list_branches(&self) -> Result<Vec<String>> {
        Ok(self.control.list_branches(Namespace::Local)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dep_types::{ChangeEntry, Commit, CommitHash, RepoPointer};

    fn repo() -> (tempfile::TempDir, ControlDir) {
        let tmp = tempfile::tempdir().unwrap();
        let control = ControlDir::create(tmp.path()).unwrap();
        control.write_pointer(&RepoPointer::default()).unwrap();
        control
            .write_manifest(Namespace::Local, "main", &BranchManifest::new())
            .unwrap();
        (tmp, control)
    }

    fn commit_on(control: &ControlDir, branch: &str, hash: &str) -> CommitHash {
        let commit = Commit {
            hash: CommitHash::parse(hash).unwrap(),
            message: format!("commit {hash}"),
            timestamp: 0,
            parent: None,
            changes: [("f".to_string(), ChangeEntry::create(hash))].into(),
        };
        let mut manifest = control
            .read_manifest(Namespace::Local, branch)
            .unwrap()
            .unwrap_or_default();
        manifest.push(commit.hash.clone());
        control.write_commit(Namespace::Local, branch, &commit).unwrap();
        control.write_manifest(Namespace::Local, branch, &manifest).unwrap();
        commit.hash
    }

    #[test]
    fn branch_copies_manifest_and_objects() {
        let (_tmp, control) = repo();
        let a = commit_on(&control, "main", "aa");
        let b = commit_on(&control, "main", "bb");
        let graph = BranchGraph::new(&control);

        let manifest = graph.create_branch("dev", "main").unwrap();
        assert_eq!(manifest.commits, vec![a.clone(), b.clone()]);
        assert!(control.has_commit(Namespace::Local, "dev", &a));
        assert!(control.has_commit(Namespace::Local, "dev", &b));
        assert_eq!(
            control.read_manifest(Namespace::Remote, "dev").unwrap(),
            Some(manifest)
        );
    }

    #[test]
    fn branches_diverge_independently() {
        let (_tmp, control) = repo();
        commit_on(&control, "main", "aa");
        let graph = BranchGraph::new(&control);
        graph.create_branch("dev", "main").unwrap();

        let c = commit_on(&control, "dev", "cc");
        assert!(!graph.manifest("main").unwrap().contains(&c));
        assert!(!control.has_commit(Namespace::Local, "main", &c));
    }

    #[test]
    fn create_rejects_bad_and_duplicate_names() {
        let (_tmp, control) = repo();
        let graph = BranchGraph::new(&control);

        assert!(matches!(
            graph.create_branch("a/b", "main"),
            Err(RefError::InvalidName { .. })
        ));
        assert!(matches!(
            graph.create_branch("main", "main"),
            Err(RefError::AlreadyExists { .. })
        ));
        assert!(matches!(
            graph.create_branch("dev", "ghost"),
            Err(RefError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_guards_active_and_missing() {
        let (_tmp, control) = repo();
        let graph = BranchGraph::new(&control);
        graph.create_branch("dev", "main").unwrap();

        assert!(matches!(
            graph.delete_branch("dev", "dev"),
            Err(RefError::InUse { .. })
        ));
        assert!(matches!(
            graph.delete_branch("ghost", "main"),
            Err(RefError::NotFound { .. })
        ));

        graph.delete_branch("dev", "main").unwrap();
        assert!(!graph.exists("dev"));
        assert!(control.read_manifest(Namespace::Remote, "dev").unwrap().is_none());
    }

    #[test]
    fn list_is_sorted() {
        let (_tmp, control) = repo();
        let graph = BranchGraph::new(&control);
        graph.create_branch("zz", "main").unwrap();
        graph.create_branch("aa", "main").unwrap();
        assert_eq!(graph.list_branches().unwrap(), vec!["aa", "main", "zz"]);
    }
}
