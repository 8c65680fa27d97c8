//! Building the stage with `add` and `rm`.

use std::path::Path;

use dep_store::ControlDir;
use dep_types::ChangeEntry;
use tracing::debug;

use crate::checkout::current_state;
use crate::error::{IndexError, IndexResult};
use crate::workdir;

/// Stage the current content of a file, or of every file under a directory.
///
/// Returns the staged paths.
pub fn add(control: &ControlDir, path: &Path) -> IndexResult<Vec<String>> {
    let root = control.root();
    let rel = workdir::normalize(root, path)?;
    let target = root.join(&rel);

    let files: Vec<(String, String)> = if target.is_dir() {
        workdir::scan(root)?
            .into_iter()
            .filter(|(p, _)| workdir::is_under(p, &rel))
            .collect()
    } else {
        let content = workdir::read_text(root, &rel)?
            .ok_or_else(|| IndexError::PathNotFound(path.display().to_string()))?;
        vec![(rel, content)]
    };

    let mut stage = control.read_stage()?.unwrap_or_default();
    let mut staged = Vec::with_capacity(files.len());
    for (path, content) in files {
        debug!(path = %path, "staging file");
        stage.insert(path.clone(), ChangeEntry::create(content));
        staged.push(path);
    }
    if !staged.is_empty() {
        control.write_stage(&stage)?;
    }
    Ok(staged)
}

/// Stage the deletion of a file (or of everything under a directory) and
/// remove it from disk.
///
/// The path must be on disk or tracked at the active commit.
pub fn rm(control: &ControlDir, path: &Path) -> IndexResult<Vec<String>> {
    let root = control.root();
    let rel = workdir::normalize(root, path)?;
    if rel.is_empty() {
        return Err(IndexError::PathNotFound(path.display().to_string()));
    }
    let tracked = current_state(control)?;

    let mut targets: Vec<String> = if root.join(&rel).is_dir() {
        workdir::scan(root)?
            .into_keys()
            .filter(|p| workdir::is_under(p, &rel))
            .collect()
    } else if root.join(&rel).is_file() {
        vec![rel.clone()]
    } else {
        Vec::new()
    };
    targets.extend(
        tracked
            .keys()
            .filter(|p| workdir::is_under(p, &rel))
            .cloned(),
    );
    targets.sort();
    targets.dedup();

    if targets.is_empty() {
        return Err(IndexError::PathNotFound(path.display().to_string()));
    }

    let mut stage = control.read_stage()?.unwrap_or_default();
    for target in &targets {
        workdir::remove(root, target)?;
        debug!(path = %target, "staging deletion");
        stage.insert(target.clone(), ChangeEntry::DeleteFile);
    }
    control.write_stage(&stage)?;
    Ok(targets)
}
