use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dep_types::{BranchManifest, Commit, CommitHash, RepoPointer, RootManifest, Stage, StashEntry};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::json::{read_json, write_json};

/// Name of the control directory inside a working tree.
pub const CONTROL_DIR: &str = ".dep";

const POINTER_FILE: &str = "dep.json";
const MANIFEST_FILE: &str = "manifest.json";
const STAGE_FILE: &str = "stage.json";
const STASH_PREFIX: &str = "stash_";

/// File-manager droppings that are never branch names.
const OS_ARTIFACTS: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// Which branch tree a manifest or commit lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Branches the user works on.
    Local,
    /// Last known state of the remote, written by fetch.
    Remote,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Local => "local",
            Namespace::Remote => "remote",
        }
    }
}

/// Handle to a repository's `.dep/` directory.
///
/// Every operation in the higher crates receives one of these explicitly;
/// nothing reads the process working directory.
#[derive(Clone, Debug)]
pub struct ControlDir {
    root: PathBuf,
    dir: PathBuf,
}

impl ControlDir {
    /// Open an existing repository rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        let dir = root.join(CONTROL_DIR);
        if !dir.join(POINTER_FILE).is_file() {
            return Err(StoreError::RepositoryNotFound(root));
        }
        Ok(Self { root, dir })
    }

    /// Create the directory skeleton for a new repository.
    ///
    /// Fails with [`StoreError::AlreadyInitialized`] if `.dep/` exists. The
    /// caller is expected to write the pointer, root snapshot and first
    /// branch manifest.
    pub fn create(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        let dir = root.join(CONTROL_DIR);
        if dir.exists() {
            return Err(StoreError::AlreadyInitialized(root));
        }

        let control = Self { root, dir };
        for sub in [
            control.dir.join("root"),
            control.namespace_dir(Namespace::Local),
            control.namespace_dir(Namespace::Remote),
            control.cache_dir(),
        ] {
            fs::create_dir_all(&sub).map_err(|e| StoreError::io(&sub, e))?;
        }
        debug!(root = %control.root.display(), "created control directory");
        Ok(control)
    }

    /// The working-tree root (parent of `.dep/`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.dep/` directory itself.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    // -- pointer --------------------------------------------------------

    pub fn pointer_path(&self) -> PathBuf {
        self.dir.join(POINTER_FILE)
    }

    pub fn read_pointer(&self) -> StoreResult<RepoPointer> {
        read_json(&self.pointer_path())?
            .ok_or_else(|| StoreError::RepositoryNotFound(self.root.clone()))
    }

    pub fn write_pointer(&self, pointer: &RepoPointer) -> StoreResult<()> {
        write_json(&self.pointer_path(), pointer)
    }

    // -- root snapshot --------------------------------------------------

    pub fn root_manifest_path(&self) -> PathBuf {
        self.dir.join("root").join(MANIFEST_FILE)
    }

    /// The root snapshot; empty when the file is missing.
    pub fn read_root(&self) -> StoreResult<RootManifest> {
        Ok(read_json(&self.root_manifest_path())?.unwrap_or_default())
    }

    pub fn write_root(&self, root: &RootManifest) -> StoreResult<()> {
        write_json(&self.root_manifest_path(), root)
    }

    // -- branches -------------------------------------------------------

    fn namespace_dir(&self, ns: Namespace) -> PathBuf {
        self.dir.join("history").join(ns.as_str())
    }

    pub fn branch_dir(&self, ns: Namespace, branch: &str) -> PathBuf {
        self.namespace_dir(ns).join(branch)
    }

    pub fn manifest_path(&self, ns: Namespace, branch: &str) -> PathBuf {
        self.branch_dir(ns, branch).join(MANIFEST_FILE)
    }

    pub fn commit_path(&self, ns: Namespace, branch: &str, hash: &CommitHash) -> PathBuf {
        self.branch_dir(ns, branch).join(hash.file_name())
    }

    /// Whether a branch directory exists in `ns`.
    ///
    /// Names that would escape the namespace directory never exist.
    pub fn branch_exists(&self, ns: Namespace, branch: &str) -> bool {
        is_plain_component(branch) && self.branch_dir(ns, branch).is_dir()
    }

    pub fn read_manifest(&self, ns: Namespace, branch: &str) -> StoreResult<Option<BranchManifest>> {
        if !is_plain_component(branch) {
            return Ok(None);
        }
        read_json(&self.manifest_path(ns, branch))
    }

    pub fn write_manifest(
        &self,
        ns: Namespace,
        branch: &str,
        manifest: &BranchManifest,
    ) -> StoreResult<()> {
        write_json(&self.manifest_path(ns, branch), manifest)
    }

    pub fn read_commit(
        &self,
        ns: Namespace,
        branch: &str,
        hash: &CommitHash,
    ) -> StoreResult<Option<Commit>> {
        if !is_plain_component(branch) {
            return Ok(None);
        }
        read_json(&self.commit_path(ns, branch, hash))
    }

    pub fn write_commit(&self, ns: Namespace, branch: &str, commit: &Commit) -> StoreResult<()> {
        write_json(&self.commit_path(ns, branch, &commit.hash), commit)
    }

    pub fn has_commit(&self, ns: Namespace, branch: &str, hash: &CommitHash) -> bool {
        is_plain_component(branch) && self.commit_path(ns, branch, hash).is_file()
    }

    /// Branch directory names in `ns`, sorted.
    pub fn list_branches(&self, ns: Namespace) -> StoreResult<Vec<String>> {
        let dir = self.namespace_dir(ns);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if OS_ARTIFACTS.contains(&name.as_str()) || !entry.path().is_dir() {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// Remove a branch directory and everything in it. Returns `false` when
    /// it did not exist.
    pub fn remove_branch(&self, ns: Namespace, branch: &str) -> StoreResult<bool> {
        if !is_plain_component(branch) {
            return Ok(false);
        }
        remove_dir_if_present(&self.branch_dir(ns, branch))
    }

    // -- stage ----------------------------------------------------------

    pub fn stage_path(&self) -> PathBuf {
        self.dir.join(STAGE_FILE)
    }

    /// The pending stage. A stage file with no changes reads as `None`.
    pub fn read_stage(&self) -> StoreResult<Option<Stage>> {
        let stage: Option<Stage> = read_json(&self.stage_path())?;
        Ok(stage.filter(|s| !s.is_empty()))
    }

    pub fn write_stage(&self, stage: &Stage) -> StoreResult<()> {
        write_json(&self.stage_path(), stage)
    }

    /// Delete the stage file. Returns `false` when there was none.
    pub fn clear_stage(&self) -> StoreResult<bool> {
        remove_file_if_present(&self.stage_path())
    }

    // -- stash ----------------------------------------------------------

    pub fn cache_dir(&self) -> PathBuf {
        self.dir.join("cache")
    }

    pub fn stash_path(&self, name: &str) -> PathBuf {
        self.cache_dir().join(format!("{name}.json"))
    }

    /// Stash entry names (`stash_<ms>`), ascending.
    pub fn list_stashes(&self) -> StoreResult<Vec<String>> {
        let dir = self.cache_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let Ok(file) = entry.file_name().into_string() else {
                continue;
            };
            if let Some(stem) = file.strip_suffix(".json") {
                if stem.starts_with(STASH_PREFIX) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn stash_exists(&self, name: &str) -> bool {
        self.stash_path(name).is_file()
    }

    pub fn read_stash(&self, name: &str) -> StoreResult<Option<StashEntry>> {
        read_json(&self.stash_path(name))
    }

    pub fn write_stash(&self, name: &str, entry: &StashEntry) -> StoreResult<()> {
        write_json(&self.stash_path(name), entry)
    }

    pub fn remove_stash(&self, name: &str) -> StoreResult<bool> {
        remove_file_if_present(&self.stash_path(name))
    }
}

/// A single path component that stays inside its parent.
fn is_plain_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

fn remove_file_if_present(path: &Path) -> StoreResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

fn remove_dir_if_present(path: &Path) -> StoreResult<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StoreError::io(path, e)),
    }
}
