//! Throwaway repositories for unit tests.

use std::cell::Cell;

use dep_crypto::SequenceHasher;
use dep_ledger::record_commit;
use dep_store::{ControlDir, Namespace};
use dep_types::{BranchManifest, ChangeEntry, CommitHash, FileMap, RepoPointer, RootManifest};
use tempfile::TempDir;

use crate::workdir;

pub(crate) struct Fixture {
    _tmp: TempDir,
    pub control: ControlDir,
    hasher: SequenceHasher,
    clock: Cell<u64>,
}

impl Fixture {
    /// A repository on `main` whose root snapshot (and working tree) is
    /// `files`.
    pub fn new(files: &[(&str, &str)]) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let control = ControlDir::create(tmp.path()).unwrap();
        let snapshot: FileMap = files
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect();
        for (path, content) in &snapshot {
            workdir::write_text(tmp.path(), path, content).unwrap();
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
            clock: Cell::new(0),
        }
    }

    pub fn write(&self, rel: &str, content: &str) {
        workdir::write_text(self.control.root(), rel, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> Option<String> {
        workdir::read_text(self.control.root(), rel).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.control.root().join(rel).exists()
    }

    pub fn remove(&self, rel: &str) {
        workdir::remove(self.control.root(), rel).unwrap();
    }

    pub fn stage(&self, path: &str, entry: ChangeEntry) {
        let mut stage = self.control.read_stage().unwrap().unwrap_or_default();
        stage.insert(path, entry);
        self.control.write_stage(&stage).unwrap();
    }

    /// Write `content` to `path` on disk and commit it on the active branch.
    pub fn commit_file(&self, path: &str, content: &str) -> CommitHash {
        self.write(path, content);
        self.stage(path, ChangeEntry::create(content));
        let now = self.clock.get() + 1;
        self.clock.set(now);
        record_commit(&self.control, &self.hasher, "test commit", now)
            .unwrap()
            .hash
    }

    pub fn manifest(&self, branch: &str) -> BranchManifest {
        self.control
            .read_manifest(Namespace::Local, branch)
            .unwrap()
            .unwrap_or_default()
    }
}
