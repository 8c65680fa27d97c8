use std::collections::HashSet;

use dep_types::{BranchManifest, CommitHash};

/// Commit negotiation: which hashes each side lacks.
pub struct NegotiationEngine;

impl NegotiationEngine {
    /// Commits the remote has that we don't, in remote order.
    pub fn wanted(local: &BranchManifest, remote: &BranchManifest) -> Vec<CommitHash> {
        Self::difference(&remote.commits, &local.commits)
    }

    /// Commits we have that the remote doesn't, in local order.
    pub fn missing(local: &BranchManifest, remote: &BranchManifest) -> Vec<CommitHash> {
        Self::difference(&local.commits, &remote.commits)
    }

    fn difference(from: &[CommitHash], without: &[CommitHash]) -> Vec<CommitHash> {
        let known: HashSet<&CommitHash> = without.iter().collect();
        from.iter().filter(|h| !known.contains(h)).cloned().collect()
    }
}
