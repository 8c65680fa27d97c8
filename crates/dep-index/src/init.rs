use std::path::Path;

use dep_store::{ControlDir, Namespace};
use dep_types::{BranchManifest, RepoPointer, RootManifest, DEFAULT_BRANCH};
use tracing::info;

use crate::error::IndexResult;
use crate::workdir;

/// Create a repository at `root`, capturing the current working tree as the
/// root snapshot.
///
/// The default branch starts with an empty history, locally and in the
/// remote mirror.
pub fn init(root: &Path) -> IndexResult<ControlDir> {
    let control = ControlDir::create(root)?;
    let files = workdir::scan(root)?;

    control.write_root(&RootManifest::from(&files))?;
    for ns in [Namespace::Local, Namespace::Remote] {
        control.write_manifest(ns, DEFAULT_BRANCH, &BranchManifest::new())?;
    }
    control.write_pointer(&RepoPointer::default())?;

    info!(root = %root.display(), files = files.len(), "initialized repository");
    Ok(control)
}
