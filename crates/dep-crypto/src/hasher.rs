use std::sync::atomic::{AtomicU64, Ordering};

use dep_types::CommitHash;

/// A hash function mapping bytes to a commit identifier.
pub trait HashFunction: Send + Sync {
    fn hash(&self, data: &[u8]) -> CommitHash;
}

/// Domain-separated BLAKE3 content hasher.
///
/// The domain tag is prepended to every hash computation so that commit
/// digests never collide with digests of other object kinds.
#[derive(Clone, Copy, Debug)]
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for commit objects.
    pub const COMMIT: Self = Self::new("dep-commit-v1");

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::COMMIT
    }
}

impl HashFunction for ContentHasher {
    fn hash(&self, data: &[u8]) -> CommitHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        CommitHash::from_digest(hasher.finalize().as_bytes())
    }
}

/// Deterministic hasher that ignores its input and counts upward.
///
/// Produces `0000000000000001`, `0000000000000002`, ... so tests can name
/// commits without depending on timestamps.
#[derive(Debug, Default)]
pub struct SequenceHasher {
    next: AtomicU64,
}

impl SequenceHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HashFunction for SequenceHasher {
    fn hash(&self, _data: &[u8]) -> CommitHash {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        CommitHash::from_digest(&n.to_be_bytes())
    }
}
