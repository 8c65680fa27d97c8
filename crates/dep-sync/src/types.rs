use std::path::PathBuf;

use dep_types::{CommitHash, Configuration, RepoPointer};

use crate::error::{SyncError, SyncResult};

/// Host used when neither the configuration nor the environment names one.
pub const DEFAULT_HOST: &str = "http://localhost:1337";

/// Environment variable overriding the remote host.
pub const HOST_ENV: &str = "DEP_HOST";

/// A remote repository as the transport addresses it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteRef {
    pub handle: String,
    pub repo: String,
    pub token: Option<String>,
}

impl RemoteRef {
    pub fn new(handle: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            repo: repo.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.token = token.filter(|t| !t.is_empty()).map(str::to_string);
        self
    }

    /// The remote named by a repository pointer: the last two path
    /// segments of `remote`, plus the configured access token.
    pub fn from_pointer(pointer: &RepoPointer) -> SyncResult<Self> {
        let url = pointer.remote.trim();
        if url.is_empty() {
            return Err(SyncError::NoRemote);
        }
        let mut segments = url.trim_end_matches('/').rsplit('/');
        match (segments.next(), segments.next()) {
            (Some(repo), Some(handle)) if !repo.is_empty() && !handle.is_empty() => {
                Ok(Self::new(handle, repo).with_token(pointer.configuration.token()))
            }
            _ => Err(SyncError::InvalidRemote(url.to_string())),
        }
    }

    /// Parse a `handle/repo` slug.
    pub fn from_slug(slug: &str) -> SyncResult<Self> {
        match slug.split_once('/') {
            Some((handle, repo)) if !handle.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self::new(handle, repo))
            }
            _ => Err(SyncError::InvalidSlug(slug.to_string())),
        }
    }
}

/// The remote host: configuration key `host`, then `$DEP_HOST`, then
/// [`DEFAULT_HOST`].
pub fn remote_host(config: &Configuration) -> String {
    config
        .get("host")
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(HOST_ENV).ok().filter(|h| !h.is_empty()))
        .unwrap_or_else(|| DEFAULT_HOST.to_string())
}

/// Expand a `handle/repo` slug against `host`. Full URLs pass through.
pub fn resolve_remote_url(input: &str, host: &str) -> String {
    if input.contains('/') && !input.starts_with("http") {
        format!("{}/{}", host.trim_end_matches('/'), input)
    } else {
        input.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResult {
    pub branch: String,
    /// Commits in the remote manifest.
    pub remote_commits: usize,
    /// Commit objects downloaded by this fetch.
    pub downloaded: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PullResult {
    pub fetch: FetchResult,
    /// Commits appended to the local branch, oldest first.
    pub applied: Vec<CommitHash>,
}

impl PullResult {
    pub fn is_up_to_date(&self) -> bool {
        self.applied.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushResult {
    pub branch: String,
    pub pushed: Vec<CommitHash>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloneResult {
    pub root: PathBuf,
    pub commits: usize,
}
