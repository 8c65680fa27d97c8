use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use dep_crypto::{ContentHasher, HashFunction};
use dep_diff::{diff_text, TextDiff};
use dep_index::{CheckoutReport, IndexError, ResetOutcome, WorkdirStatus};
use dep_merge::MergeReport;
use dep_refs::BranchGraph;
use dep_stash::{PopReport, StashInfo, StashOutcome};
use dep_store::ControlDir;
use dep_sync::{
    remote_host, resolve_remote_url, CloneResult, FetchResult, HttpTransport, PullResult,
    PushResult, RemoteTransport,
};
use dep_types::{Commit, RepoPointer};
use tracing::info;

use crate::error::SdkResult;

/// Line diff of one working-tree file against the current state.
#[derive(Clone, Debug)]
pub struct FileDiff {
    pub path: String,
    pub diff: TextDiff,
}

/// Everything `diff` reports: per-file line diffs plus staged paths.
#[derive(Clone, Debug, Default)]
pub struct DiffReport {
    pub files: Vec<FileDiff>,
    pub staged: Vec<String>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.staged.is_empty()
    }
}

/// High-level dep repository API.
pub struct Repository {
    control: ControlDir,
    hasher: Box<dyn HashFunction>,
}

impl Repository {
    /// Initialize a repository at `path`, capturing its current contents
    /// as the root snapshot.
    pub fn init(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path).map_err(|e| dep_store::StoreError::io(path, e))?;
        let control = dep_index::init(path)?;
        Ok(Self::from_control(control))
    }

    /// Open the repository rooted at `path`.
    pub fn open(path: impl AsRef<Path>) -> SdkResult<Self> {
        Ok(Self::from_control(ControlDir::open(path)?))
    }

    fn from_control(control: ControlDir) -> Self {
        Self {
            control,
            hasher: Box::new(ContentHasher::COMMIT),
        }
    }

    /// Replace the commit hasher.
    pub fn with_hasher(mut self, hasher: Box<dyn HashFunction>) -> Self {
        self.hasher = hasher;
        self
    }

    // ---- Accessors ----

    pub fn root(&self) -> &Path {
        self.control.root()
    }

    pub fn control(&self) -> &ControlDir {
        &self.control
    }

    pub fn pointer(&self) -> SdkResult<RepoPointer> {
        Ok(self.control.read_pointer()?)
    }

    pub fn current_branch(&self) -> SdkResult<String> {
        Ok(self.pointer()?.active.branch)
    }

    // ---- Configuration ----

    pub fn config_entries(&self) -> SdkResult<Vec<(String, String)>> {
        Ok(self.pointer()?.configuration.entries())
    }

    pub fn config_get(&self, key: &str) -> SdkResult<Option<String>> {
        Ok(self.pointer()?.configuration.get(key).map(str::to_string))
    }

    pub fn config_set(&self, key: &str, value: &str) -> SdkResult<()> {
        let mut pointer = self.pointer()?;
        pointer.configuration.set(key, value);
        self.control.write_pointer(&pointer)?;
        info!(key, "configuration updated");
        Ok(())
    }

    /// The configured remote URL (empty when unset).
    pub fn remote(&self) -> SdkResult<String> {
        Ok(self.pointer()?.remote)
    }

    /// Set the remote. A `handle/repo` slug expands against the configured
    /// host. Returns the stored URL.
    pub fn set_remote(&self, input: &str) -> SdkResult<String> {
        let mut pointer = self.pointer()?;
        pointer.remote = resolve_remote_url(input, &remote_host(&pointer.configuration));
        self.control.write_pointer(&pointer)?;
        info!(remote = %pointer.remote, "remote set");
        Ok(pointer.remote)
    }

    // ---- Working tree ----

    pub fn status(&self) -> SdkResult<WorkdirStatus> {
        Ok(dep_index::status(&self.control)?)
    }

    /// Stage a file or directory (relative to the repository root or
    /// absolute).
    pub fn add(&self, path: impl AsRef<Path>) -> SdkResult<Vec<String>> {
        Ok(dep_index::add(&self.control, &self.resolve(path))?)
    }

    /// Stage deletions and remove the files from disk.
    pub fn rm(&self, path: impl AsRef<Path>) -> SdkResult<Vec<String>> {
        Ok(dep_index::rm(&self.control, &self.resolve(path))?)
    }

    /// Line diffs of changed and deleted files against the current state,
    /// plus the staged paths.
    pub fn diff(&self) -> SdkResult<DiffReport> {
        let tracked = dep_index::current_state(&self.control)?;
        let on_disk = dep_index::workdir::scan(self.root())?;

        let mut files = Vec::new();
        for (path, content) in &on_disk {
            let previous = tracked.get(path).map(String::as_str).unwrap_or("");
            if previous != content {
                files.push(FileDiff {
                    path: path.clone(),
                    diff: diff_text(previous, content),
                });
            }
        }
        for (path, previous) in tracked.iter().filter(|(p, _)| !on_disk.contains_key(*p)) {
            files.push(FileDiff {
                path: path.clone(),
                diff: diff_text(previous, ""),
            });
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let staged = self
            .control
            .read_stage()?
            .map(|s| s.changes.into_keys().collect())
            .unwrap_or_default();
        Ok(DiffReport { files, staged })
    }

    fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root().join(path)
        }
    }

    // ---- History ----

    /// Commit the stage on the active branch.
    pub fn commit(&self, message: &str) -> SdkResult<Commit> {
        Ok(dep_ledger::record_commit(
            &self.control,
            self.hasher.as_ref(),
            message,
            now_ms(),
        )?)
    }

    /// Commits on the active branch, newest first.
    pub fn log(&self) -> SdkResult<Vec<Commit>> {
        let branch = self.current_branch()?;
        Ok(dep_ledger::log(&self.control, &branch)?)
    }

    /// Clear the stage; with a hash, also rewind the active branch to it.
    pub fn reset(&self, hash: Option<&str>) -> SdkResult<ResetOutcome> {
        Ok(dep_index::reset(&self.control, hash)?)
    }

    // ---- Branches ----

    pub fn branches(&self) -> SdkResult<Vec<String>> {
        Ok(BranchGraph::new(&self.control).list_branches()?)
    }

    /// Create `name` as a copy of the active branch.
    pub fn create_branch(&self, name: &str) -> SdkResult<()> {
        let active = self.current_branch()?;
        BranchGraph::new(&self.control).create_branch(name, &active)?;
        Ok(())
    }

    pub fn delete_branch(&self, name: &str) -> SdkResult<()> {
        let active = self.current_branch()?;
        BranchGraph::new(&self.control).delete_branch(name, &active)?;
        Ok(())
    }

    pub fn checkout(&self, branch: &str, force: bool) -> SdkResult<CheckoutReport> {
        Ok(dep_index::checkout(&self.control, branch, force)?)
    }

    /// Create `name` from the active branch and switch to it.
    ///
    /// The dirty check runs first, so a refused switch leaves no branch
    /// behind.
    pub fn checkout_new(&self, name: &str, force: bool) -> SdkResult<CheckoutReport> {
        if !force && dep_index::is_dirty(&self.control)? {
            return Err(IndexError::UncommittedChanges.into());
        }
        self.create_branch(name)?;
        self.checkout(name, true)
    }

    pub fn merge(&self, branch: &str) -> SdkResult<MergeReport> {
        Ok(dep_merge::merge(&self.control, branch)?)
    }

    // ---- Stash ----

    pub fn stash_push(&self) -> SdkResult<StashOutcome> {
        Ok(dep_stash::push(&self.control, now_ms())?)
    }

    pub fn stash_pop(&self) -> SdkResult<PopReport> {
        Ok(dep_stash::pop(&self.control)?)
    }

    pub fn stash_list(&self) -> SdkResult<Vec<StashInfo>> {
        Ok(dep_stash::list(&self.control)?)
    }

    // ---- Sync ----

    /// HTTP transport for the configured host.
    pub fn transport(&self) -> SdkResult<HttpTransport> {
        let pointer = self.pointer()?;
        Ok(HttpTransport::new(remote_host(&pointer.configuration)))
    }

    pub async fn fetch(&self) -> SdkResult<FetchResult> {
        self.fetch_with(&self.transport()?).await
    }

    pub async fn fetch_with(&self, transport: &dyn RemoteTransport) -> SdkResult<FetchResult> {
        Ok(dep_sync::fetch(&self.control, transport).await?)
    }

    pub async fn pull(&self) -> SdkResult<PullResult> {
        self.pull_with(&self.transport()?).await
    }

    pub async fn pull_with(&self, transport: &dyn RemoteTransport) -> SdkResult<PullResult> {
        Ok(dep_sync::pull(&self.control, transport).await?)
    }

    pub async fn push(&self) -> SdkResult<PushResult> {
        self.push_with(&self.transport()?).await
    }

    pub async fn push_with(&self, transport: &dyn RemoteTransport) -> SdkResult<PushResult> {
        Ok(dep_sync::push(&self.control, transport).await?)
    }

    /// Clone `slug` (`handle/repo`) into `parent/<repo>` over HTTP, using
    /// `$DEP_HOST` or the default host.
    pub async fn clone_remote(slug: &str, parent: &Path) -> SdkResult<(Self, CloneResult)> {
        let host = remote_host(&Default::default());
        let transport = HttpTransport::new(host.clone());
        Self::clone_with(&transport, slug, parent, &host).await
    }

    pub async fn clone_with(
        transport: &dyn RemoteTransport,
        slug: &str,
        parent: &Path,
        host: &str,
    ) -> SdkResult<(Self, CloneResult)> {
        let remote = dep_sync::RemoteRef::from_slug(slug)?;
        let dest = parent.join(&remote.repo);
        let result = dep_sync::clone(transport, slug, &dest, host).await?;
        let repo = Self::open(&result.root)?;
        Ok((repo, result))
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use dep_crypto::SequenceHasher;
    use dep_index::FileStatus;
    use dep_sync::InMemoryRemote;
    use dep_types::RootManifest;

    use crate::error::SdkError;

    fn repo(dir: &Path) -> Repository {
        Repository::init(dir)
            .unwrap()
            .with_hasher(Box::new(SequenceHasher::new()))
    }

    fn write(repo: &Repository, rel: &str, content: &str) {
        let path = repo.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn read(repo: &Repository, rel: &str) -> Option<String> {
        std::fs::read_to_string(repo.root().join(rel)).ok()
    }

    #[test]
    fn init_then_open() {
        let tmp = tempfile::tempdir().unwrap();
        repo(tmp.path());
        let reopened = Repository::open(tmp.path()).unwrap();
        assert_eq!(reopened.current_branch().unwrap(), "main");
        assert_eq!(reopened.branches().unwrap(), vec!["main".to_string()]);
    }

    #[test]
    fn open_missing_repository() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Repository::open(tmp.path()).err().unwrap();
        assert!(matches!(
            err,
            SdkError::Store(dep_store::StoreError::RepositoryNotFound(_))
        ));
    }

    #[test]
    fn add_commit_log() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = repo(tmp.path());
        write(&repo, "a.txt", "hello");

        assert_eq!(repo.add("a.txt").unwrap(), vec!["a.txt".to_string()]);
        let status = repo.status().unwrap();
        assert_eq!(status.staged.len(), 1);
        assert_eq!(status.staged[0].status, FileStatus::New);

        let first = repo.commit("first").unwrap();
        write(&repo, "a.txt", "hello again");
        repo.add("a.txt").unwrap();
        let second = repo.commit("second").unwrap();

        let log = repo.log().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].hash, second.hash);
        assert_eq!(log[1].hash, first.hash);
        assert!(repo.status().unwrap().is_clean());
    }

    #[test]
    fn commit_with_empty_stage_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = repo(tmp.path());
        assert!(matches!(
            repo.commit("nothing"),
            Err(SdkError::Ledger(dep_ledger::LedgerError::EmptyStage))
        ));
    }

    #[test]
    fn diff_reports_changed_and_staged_files() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = repo(tmp.path());
        write(&repo, "a.txt", "one\ntwo\n");
        repo.add("a.txt").unwrap();
        repo.commit("base").unwrap();

        assert!(repo.diff().unwrap().is_empty());

        write(&repo, "a.txt", "one\nthree\n");
        write(&repo, "b.txt", "new\n");
        repo.add("b.txt").unwrap();

        let report = repo.diff().unwrap();
        let paths: Vec<&str> = report.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "b.txt"]);
        assert_eq!(report.files[0].diff.additions(), 1);
        assert_eq!(report.files[0].diff.deletions(), 1);
        assert_eq!(report.staged, vec!["b.txt".to_string()]);
    }

    #[test]
    fn branch_checkout_merge() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = repo(tmp.path());
        write(&repo, "shared.txt", "base");
        repo.add("shared.txt").unwrap();
        repo.commit("base").unwrap();

        repo.checkout_new("feature", false).unwrap();
        assert_eq!(repo.current_branch().unwrap(), "feature");
        write(&repo, "shared.txt", "feature edit");
        repo.add("shared.txt").unwrap();
        repo.commit("edit").unwrap();

        repo.checkout("main", false).unwrap();
        assert_eq!(read(&repo, "shared.txt").as_deref(), Some("base"));

        let report = repo.merge("feature").unwrap();
        assert!(report.is_clean());
        assert_eq!(read(&repo, "shared.txt").as_deref(), Some("feature edit"));
        repo.commit("merge feature").unwrap();

        assert!(matches!(
            repo.delete_branch("main"),
            Err(SdkError::Ref(dep_refs::RefError::InUse { .. }))
        ));
        repo.delete_branch("feature").unwrap();
        assert_eq!(repo.branches().unwrap(), vec!["main".to_string()]);
    }

    #[test]
    fn refused_checkout_new_creates_no_branch() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = repo(tmp.path());
        write(&repo, "a.txt", "v1");
        repo.add("a.txt").unwrap();
        repo.commit("v1").unwrap();
        write(&repo, "a.txt", "edited");

        assert!(matches!(
            repo.checkout_new("feat", false),
            Err(SdkError::Index(IndexError::UncommittedChanges))
        ));
        assert_eq!(repo.branches().unwrap(), vec!["main".to_string()]);
        assert!(!repo.control().branch_exists(dep_store::Namespace::Remote, "feat"));
        assert_eq!(repo.current_branch().unwrap(), "main");
        assert_eq!(read(&repo, "a.txt").as_deref(), Some("edited"));

        let report = repo.checkout_new("feat", true).unwrap();
        assert_eq!(report.branch, "feat");
    }

    #[test]
    fn stash_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = repo(tmp.path());
        write(&repo, "a.txt", "v1");
        repo.add("a.txt").unwrap();
        repo.commit("v1").unwrap();

        write(&repo, "a.txt", "v2");
        assert!(matches!(repo.stash_push().unwrap(), StashOutcome::Saved { .. }));
        assert_eq!(read(&repo, "a.txt").as_deref(), Some("v1"));
        assert_eq!(repo.stash_list().unwrap().len(), 1);

        repo.stash_pop().unwrap();
        assert_eq!(read(&repo, "a.txt").as_deref(), Some("v2"));
        assert!(repo.stash_list().unwrap().is_empty());
    }

    #[test]
    fn reset_rewinds_history() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = repo(tmp.path());
        write(&repo, "a.txt", "v1");
        repo.add("a.txt").unwrap();
        let first = repo.commit("v1").unwrap();
        write(&repo, "a.txt", "v2");
        repo.add("a.txt").unwrap();
        repo.commit("v2").unwrap();

        repo.reset(Some(first.hash.as_str())).unwrap();
        assert_eq!(repo.log().unwrap().len(), 1);
        assert_eq!(read(&repo, "a.txt").as_deref(), Some("v1"));
    }

    #[test]
    fn configuration_and_remote() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = repo(tmp.path());
        repo.config_set("handle", "alice").unwrap();
        repo.config_set("host", "http://example.test").unwrap();
        assert_eq!(repo.config_get("handle").unwrap().as_deref(), Some("alice"));

        let url = repo.set_remote("alice/notes").unwrap();
        assert_eq!(url, "http://example.test/alice/notes");
        assert_eq!(repo.remote().unwrap(), url);
        assert_eq!(repo.transport().unwrap().host(), "http://example.test");
    }

    #[tokio::test]
    async fn push_and_clone_through_memory_remote() {
        let tmp = tempfile::tempdir().unwrap();
        let source_dir = tmp.path().join("source");
        let repo = repo(&source_dir);
        repo.set_remote("http://localhost:1337/alice/notes").unwrap();
        write(&repo, "a.txt", "synced");
        repo.add("a.txt").unwrap();
        repo.commit("sync me").unwrap();

        let remote = InMemoryRemote::new();
        remote
            .seed_root(&dep_sync::RemoteRef::new("alice", "notes"), RootManifest::default())
            .unwrap();
        let pushed = repo.push_with(&remote).await.unwrap();
        assert_eq!(pushed.pushed.len(), 1);

        let clones = tmp.path().join("clones");
        std::fs::create_dir(&clones).unwrap();
        let (copy, result) =
            Repository::clone_with(&remote, "alice/notes", &clones, "http://localhost:1337")
                .await
                .unwrap();
        assert_eq!(result.root, clones.join("notes"));
        assert_eq!(read(&copy, "a.txt").as_deref(), Some("synced"));
        assert_eq!(copy.log().unwrap().len(), 1);
    }
}
