//! An in-process remote, for tests and embedding.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use dep_types::{BranchManifest, Commit, CommitHash, RootManifest};

use crate::error::{SyncError, SyncResult};
use crate::transport::RemoteTransport;
use crate::types::RemoteRef;

#[derive(Debug, Default)]
struct RemoteRepo {
    root: RootManifest,
    branches: HashMap<String, Vec<Commit>>,
}

/// A history store held in memory, keyed by `handle/repo`.
///
/// Fetching from an unknown repository fails with a 404 like the HTTP
/// server does; pushing to one creates it.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    repos: RwLock<HashMap<String, RemoteRepo>>,
}

fn key(remote: &RemoteRef) -> String {
    format!("{}/{}", remote.handle, remote.repo)
}

fn not_found(what: impl std::fmt::Display) -> SyncError {
    SyncError::RemoteError {
        status: 404,
        message: format!("{what} not found"),
    }
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace the root of) a repository.
    pub fn seed_root(&self, remote: &RemoteRef, root: RootManifest) -> SyncResult<()> {
        let mut repos = self.write()?;
        repos.entry(key(remote)).or_default().root = root;
        Ok(())
    }

    /// Append a commit to `branch`, creating the repository if needed.
    pub fn seed_commit(&self, remote: &RemoteRef, branch: &str, commit: Commit) -> SyncResult<()> {
        let mut repos = self.write()?;
        repos
            .entry(key(remote))
            .or_default()
            .branches
            .entry(branch.to_string())
            .or_default()
            .push(commit);
        Ok(())
    }

    /// Hashes on `branch`, oldest first.
    pub fn commits(&self, remote: &RemoteRef, branch: &str) -> SyncResult<Vec<CommitHash>> {
        let repos = self.read()?;
        Ok(repos
            .get(&key(remote))
            .and_then(|r| r.branches.get(branch))
            .map(|commits| commits.iter().map(|c| c.hash.clone()).collect())
            .unwrap_or_default())
    }

    fn read(&self) -> SyncResult<std::sync::RwLockReadGuard<'_, HashMap<String, RemoteRepo>>> {
        self.repos
            .read()
            .map_err(|e| SyncError::TransportError(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> SyncResult<std::sync::RwLockWriteGuard<'_, HashMap<String, RemoteRepo>>> {
        self.repos
            .write()
            .map_err(|e| SyncError::TransportError(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl RemoteTransport for InMemoryRemote {
    async fn fetch_root(&self, remote: &RemoteRef, _branch: &str) -> SyncResult<RootManifest> {
        let repos = self.read()?;
        repos
            .get(&key(remote))
            .map(|r| r.root.clone())
            .ok_or_else(|| not_found(key(remote)))
    }

    async fn fetch_manifest(&self, remote: &RemoteRef, branch: &str) -> SyncResult<BranchManifest> {
        let repos = self.read()?;
        let repo = repos.get(&key(remote)).ok_or_else(|| not_found(key(remote)))?;
        let commits = repo
            .branches
            .get(branch)
            .map(|commits| commits.iter().map(|c| c.hash.clone()).collect())
            .unwrap_or_default();
        Ok(BranchManifest { commits })
    }

    async fn fetch_commit(
        &self,
        remote: &RemoteRef,
        branch: &str,
        hash: &CommitHash,
    ) -> SyncResult<Commit> {
        let repos = self.read()?;
        repos
            .get(&key(remote))
            .and_then(|r| r.branches.get(branch))
            .and_then(|commits| commits.iter().find(|c| &c.hash == hash))
            .cloned()
            .ok_or_else(|| not_found(format!("commit {hash}")))
    }

    async fn push_commit(&self, remote: &RemoteRef, branch: &str, commit: &Commit) -> SyncResult<()> {
        let mut repos = self.write()?;
        let commits = repos
            .entry(key(remote))
            .or_default()
            .branches
            .entry(branch.to_string())
            .or_default();
        if !commits.iter().any(|c| c.hash == commit.hash) {
            commits.push(commit.clone());
        }
        Ok(())
    }
}
