use async_trait::async_trait;
use dep_types::{BranchManifest, Commit, CommitHash, RootManifest};

use crate::error::SyncResult;
use crate::types::RemoteRef;

/// Transport interface for remote dep history stores.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// The remote's root snapshot.
    async fn fetch_root(&self, remote: &RemoteRef, branch: &str) -> SyncResult<RootManifest>;

    /// The remote's commit list for `branch`.
    async fn fetch_manifest(&self, remote: &RemoteRef, branch: &str) -> SyncResult<BranchManifest>;

    async fn fetch_commit(
        &self,
        remote: &RemoteRef,
        branch: &str,
        hash: &CommitHash,
    ) -> SyncResult<Commit>;

    /// Upload one commit; the remote appends it to `branch`.
    async fn push_commit(&self, remote: &RemoteRef, branch: &str, commit: &Commit) -> SyncResult<()>;
}
