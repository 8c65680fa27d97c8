//! Fetch, pull, push and clone.
//!
//! All four work on the active branch (clone: `main`) and move whole
//! commit objects between the remote and the two local namespaces.

use std::path::Path;

use dep_index::{checkout, is_dirty};
use dep_store::{ControlDir, Namespace};
use dep_types::{BranchManifest, DEFAULT_BRANCH};
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::negotiation::NegotiationEngine;
use crate::transport::RemoteTransport;
use crate::types::{resolve_remote_url, CloneResult, FetchResult, PullResult, PushResult, RemoteRef};

/// Download every commit on the remote `branch` that `Namespace::Remote`
/// lacks, writing it into each namespace in `into`. Returns the remote
/// manifest and the number of objects downloaded.
async fn download(
    control: &ControlDir,
    transport: &dyn RemoteTransport,
    remote: &RemoteRef,
    branch: &str,
    into: &[Namespace],
) -> SyncResult<(BranchManifest, usize)> {
    let manifest = transport.fetch_manifest(remote, branch).await?;
    let mut downloaded = 0;

    for hash in &manifest.commits {
        if into.iter().all(|ns| control.has_commit(*ns, branch, hash)) {
            continue;
        }
        let commit = transport.fetch_commit(remote, branch, hash).await?;
        if &commit.hash != hash {
            return Err(SyncError::HashMismatch {
                expected: hash.to_string(),
                got: commit.hash.to_string(),
            });
        }
        for ns in into {
            control.write_commit(*ns, branch, &commit)?;
        }
        debug!(branch, hash = %hash.short(), "downloaded commit");
        downloaded += 1;
    }

    Ok((manifest, downloaded))
}

/// Mirror the remote's copy of the active branch into
/// `history/remote/<branch>/`. The local branch is untouched.
pub async fn fetch(control: &ControlDir, transport: &dyn RemoteTransport) -> SyncResult<FetchResult> {
    let pointer = control.read_pointer()?;
    let remote = RemoteRef::from_pointer(&pointer)?;
    let branch = pointer.active.branch;

    let (manifest, downloaded) =
        download(control, transport, &remote, &branch, &[Namespace::Remote]).await?;
    control.write_manifest(Namespace::Remote, &branch, &manifest)?;

    info!(branch = %branch, remote_commits = manifest.len(), downloaded, "fetched");
    Ok(FetchResult {
        branch,
        remote_commits: manifest.len(),
        downloaded,
    })
}

/// Fetch, then append the remote-only commits to the local branch and
/// check out its new tip.
///
/// Refuses with [`SyncError::UncommittedChanges`] when the working
/// directory is dirty, since the checkout would overwrite it.
pub async fn pull(control: &ControlDir, transport: &dyn RemoteTransport) -> SyncResult<PullResult> {
    if is_dirty(control)? {
        return Err(SyncError::UncommittedChanges);
    }

    let fetched = fetch(control, transport).await?;
    let branch = fetched.branch.as_str();
    let remote_manifest = control
        .read_manifest(Namespace::Remote, branch)?
        .unwrap_or_default();
    let mut local = control
        .read_manifest(Namespace::Local, branch)?
        .unwrap_or_default();

    let mut applied = Vec::new();
    for hash in NegotiationEngine::wanted(&local, &remote_manifest) {
        // Fetch just wrote every remote commit into the mirror.
        let Some(commit) = control.read_commit(Namespace::Remote, branch, &hash)? else {
            continue;
        };
        control.write_commit(Namespace::Local, branch, &commit)?;
        local.push(hash.clone());
        applied.push(hash);
    }

    if !applied.is_empty() {
        control.write_manifest(Namespace::Local, branch, &local)?;
        checkout(control, branch, true)?;
    }

    info!(branch, applied = applied.len(), "pulled");
    Ok(PullResult {
        fetch: fetched,
        applied,
    })
}

/// Upload local commits on the active branch that the remote lacks, oldest
/// first.
pub async fn push(control: &ControlDir, transport: &dyn RemoteTransport) -> SyncResult<PushResult> {
    let pointer = control.read_pointer()?;
    let remote = RemoteRef::from_pointer(&pointer)?;
    let branch = pointer.active.branch;

    let local = control
        .read_manifest(Namespace::Local, &branch)?
        .unwrap_or_default();
    let remote_manifest = transport.fetch_manifest(&remote, &branch).await?;

    let mut pushed = Vec::new();
    for hash in NegotiationEngine::missing(&local, &remote_manifest) {
        let Some(commit) = control.read_commit(Namespace::Local, &branch, &hash)? else {
            warn!(branch = %branch, hash = %hash.short(), "commit object missing, not pushed");
            continue;
        };
        transport.push_commit(&remote, &branch, &commit).await?;
        debug!(branch = %branch, hash = %hash.short(), "pushed commit");
        pushed.push(hash);
    }

    info!(branch = %branch, pushed = pushed.len(), "pushed");
    Ok(PushResult { branch, pushed })
}

/// Create a repository at `dest` from the remote `slug` (`handle/repo`).
///
/// `dest` must not exist. The root snapshot and `main` history are
/// written to both namespaces, the remote URL is recorded in the pointer,
/// and `main` is checked out.
pub async fn clone(
    transport: &dyn RemoteTransport,
    slug: &str,
    dest: &Path,
    host: &str,
) -> SyncResult<CloneResult> {
    let remote = RemoteRef::from_slug(slug)?;
    if dest.exists() {
        return Err(SyncError::DestinationExists(dest.to_path_buf()));
    }
    std::fs::create_dir_all(dest).map_err(|e| dep_store::StoreError::io(dest, e))?;

    let control = dep_index::init(dest)?;
    let root = transport.fetch_root(&remote, DEFAULT_BRANCH).await?;
    control.write_root(&root)?;

    let (manifest, _) = download(
        &control,
        transport,
        &remote,
        DEFAULT_BRANCH,
        &[Namespace::Local, Namespace::Remote],
    )
    .await?;
    for ns in [Namespace::Local, Namespace::Remote] {
        control.write_manifest(ns, DEFAULT_BRANCH, &manifest)?;
    }

    let mut pointer = control.read_pointer()?;
    pointer.remote = resolve_remote_url(slug, host);
    control.write_pointer(&pointer)?;
    checkout(&control, DEFAULT_BRANCH, true)?;

    info!(slug, dest = %dest.display(), commits = manifest.len(), "cloned");
    Ok(CloneResult {
        root: dest.to_path_buf(),
        commits: manifest.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dep_crypto::SequenceHasher;
    use dep_ledger::record_commit;
    use dep_types::{ChangeEntry, RootFile, RootManifest, Stage};

    use crate::memory::InMemoryRemote;

    const HOST: &str = "http://localhost:1337";

    fn repo_with_remote(tmp: &Path) -> ControlDir {
        let control = dep_index::init(tmp).unwrap();
        let mut pointer = control.read_pointer().unwrap();
        pointer.remote = format!("{HOST}/alice/notes");
        control.write_pointer(&pointer).unwrap();
        control
    }

    fn commit_file(control: &ControlDir, hasher: &SequenceHasher, path: &str, content: &str, at: u64) {
        std::fs::write(control.root().join(path), content).unwrap();
        let mut stage = Stage::default();
        stage.insert(path, ChangeEntry::create(content));
        control.write_stage(&stage).unwrap();
        record_commit(control, hasher, "msg", at).unwrap();
    }

    fn slug() -> RemoteRef {
        RemoteRef::new("alice", "notes")
    }

    #[tokio::test]
    async fn push_then_clone_reproduces_the_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        std::fs::create_dir(&source).unwrap();
        let control = repo_with_remote(&source);
        let hasher = SequenceHasher::new();
        commit_file(&control, &hasher, "a.txt", "one", 1);
        commit_file(&control, &hasher, "b.txt", "two", 2);

        let remote = InMemoryRemote::new();
        remote.seed_root(&slug(), RootManifest::default()).unwrap();
        let pushed = push(&control, &remote).await.unwrap();
        assert_eq!(pushed.pushed.len(), 2);
        assert_eq!(remote.commits(&slug(), "main").unwrap(), pushed.pushed);

        let again = push(&control, &remote).await.unwrap();
        assert!(again.pushed.is_empty());

        let dest = tmp.path().join("copy");
        let cloned = clone(&remote, "alice/notes", &dest, HOST).await.unwrap();
        assert_eq!(cloned.commits, 2);
        assert_eq!(std::fs::read_to_string(dest.join("a.txt")).unwrap(), "one");
        assert_eq!(std::fs::read_to_string(dest.join("b.txt")).unwrap(), "two");

        let copy = ControlDir::open(&dest).unwrap();
        let pointer = copy.read_pointer().unwrap();
        assert_eq!(pointer.remote, "http://localhost:1337/alice/notes");
        assert_eq!(pointer.active.parent, pushed.pushed.last().cloned());
        assert!(copy.has_commit(Namespace::Remote, "main", &pushed.pushed[0]));
        assert!(!is_dirty(&copy).unwrap());
    }

    #[tokio::test]
    async fn clone_writes_root_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let remote = InMemoryRemote::new();
        remote
            .seed_root(
                &slug(),
                RootManifest {
                    files: vec![RootFile {
                        path: "README".into(),
                        content: "hi".into(),
                    }],
                },
            )
            .unwrap();

        let dest = tmp.path().join("notes");
        let cloned = clone(&remote, "alice/notes", &dest, HOST).await.unwrap();
        assert_eq!(cloned.commits, 0);
        assert_eq!(std::fs::read_to_string(dest.join("README")).unwrap(), "hi");
    }

    #[tokio::test]
    async fn clone_refuses_existing_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let remote = InMemoryRemote::new();
        let err = clone(&remote, "alice/notes", tmp.path(), HOST).await.unwrap_err();
        assert!(matches!(err, SyncError::DestinationExists(_)));
    }

    #[tokio::test]
    async fn pull_applies_remote_commits() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        std::fs::create_dir(&a).unwrap();
        std::fs::create_dir(&b).unwrap();

        let remote = InMemoryRemote::new();
        remote.seed_root(&slug(), RootManifest::default()).unwrap();

        let writer = repo_with_remote(&a);
        let reader = repo_with_remote(&b);
        let hasher = SequenceHasher::new();
        commit_file(&writer, &hasher, "note.txt", "v1", 1);
        push(&writer, &remote).await.unwrap();

        let pulled = pull(&reader, &remote).await.unwrap();
        assert_eq!(pulled.applied.len(), 1);
        assert_eq!(pulled.fetch.downloaded, 1);
        assert_eq!(std::fs::read_to_string(b.join("note.txt")).unwrap(), "v1");
        assert_eq!(
            reader.read_pointer().unwrap().active.parent,
            pulled.applied.last().cloned()
        );

        let again = pull(&reader, &remote).await.unwrap();
        assert!(again.is_up_to_date());
        assert_eq!(again.fetch.downloaded, 0);
    }

    #[tokio::test]
    async fn pull_refuses_dirty_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let control = repo_with_remote(tmp.path());
        std::fs::write(tmp.path().join("scratch.txt"), "x").unwrap();

        let remote = InMemoryRemote::new();
        let err = pull(&control, &remote).await.unwrap_err();
        assert!(matches!(err, SyncError::UncommittedChanges));
    }

    #[tokio::test]
    async fn fetch_without_remote_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let control = dep_index::init(tmp.path()).unwrap();
        let remote = InMemoryRemote::new();
        assert!(matches!(fetch(&control, &remote).await, Err(SyncError::NoRemote)));
    }

    #[tokio::test]
    async fn fetch_mirrors_without_touching_local() {
        let tmp = tempfile::tempdir().unwrap();
        let control = repo_with_remote(tmp.path());
        let remote = InMemoryRemote::new();
        remote.seed_root(&slug(), RootManifest::default()).unwrap();

        let other = tempfile::tempdir().unwrap();
        let writer = repo_with_remote(other.path());
        commit_file(&writer, &SequenceHasher::new(), "f", "x", 1);
        push(&writer, &remote).await.unwrap();

        let fetched = fetch(&control, &remote).await.unwrap();
        assert_eq!(fetched.remote_commits, 1);
        assert_eq!(control.read_manifest(Namespace::Remote, "main").unwrap().unwrap().len(), 1);
        assert!(control.read_manifest(Namespace::Local, "main").unwrap().unwrap().is_empty());
        assert!(!tmp.path().join("f").exists());
    }
}
