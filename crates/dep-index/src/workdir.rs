//! The working tree as a path → content map.
//!
//! Paths are relative to the repository root and always `/`-separated. The
//! control directory is never part of the working tree.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use dep_store::CONTROL_DIR;
use dep_types::FileMap;
use tracing::warn;
use walkdir::WalkDir;

use crate::error::{IndexError, IndexResult};

/// Read every text file under `root`, recursively.
///
/// Files that are not valid UTF-8 are skipped with a warning. Unreadable
/// directories fail the scan.
pub fn scan(root: &Path) -> IndexResult<FileMap> {
    let mut files = FileMap::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == CONTROL_DIR))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                match err.into_io_error() {
                    Some(source) => return Err(IndexError::io(path, source)),
                    None => {
                        warn!(path = %path.display(), "skipping filesystem loop");
                        continue;
                    }
                }
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(rel) = relative(root, entry.path()) else {
            continue;
        };
        let bytes = fs::read(entry.path()).map_err(|e| IndexError::io(entry.path(), e))?;
        match String::from_utf8(bytes) {
            Ok(text) => {
                files.insert(rel, text);
            }
            Err(_) => warn!(path = %rel, "skipping non-UTF-8 file"),
        }
    }

    Ok(files)
}

/// Read one working-tree file. Missing or non-UTF-8 files are `None`.
pub fn read_text(root: &Path, rel: &str) -> IndexResult<Option<String>> {
    let path = root.join(rel);
    match fs::read(&path) {
        Ok(bytes) => Ok(String::from_utf8(bytes).ok()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(IndexError::io(path, e)),
    }
}

/// Write one working-tree file, creating parent directories.
pub fn write_text(root: &Path, rel: &str, content: &str) -> IndexResult<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| IndexError::io(parent, e))?;
    }
    fs::write(&path, content).map_err(|e| IndexError::io(path, e))
}

/// Remove one working-tree file. Returns `false` if it was already gone.
pub fn remove(root: &Path, rel: &str) -> IndexResult<bool> {
    let path = root.join(rel);
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(IndexError::io(path, e)),
    }
}

/// Whether `path` is `prefix` itself or lies inside it.
///
/// An empty prefix (the repository root) contains everything.
pub fn is_under(path: &str, prefix: &str) -> bool {
    prefix.is_empty()
        || path == prefix
        || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
}

/// Resolve a user-supplied path to a working-tree path.
///
/// Relative inputs are taken relative to `root`. `.` and `..` are resolved
/// lexically. Paths outside the tree or inside the control directory are
/// rejected with [`IndexError::PathNotFound`].
pub fn normalize(root: &Path, input: &Path) -> IndexResult<String> {
    let not_found = || IndexError::PathNotFound(input.display().to_string());

    let absolute = if input.is_absolute() {
        input.to_path_buf()
    } else {
        root.join(input)
    };
    let root = lexical(root);
    let absolute = lexical(&absolute);

    let rel = absolute.strip_prefix(&root).map_err(|_| not_found())?;
    let parts: Vec<&str> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    if parts.first() == Some(&CONTROL_DIR) {
        return Err(not_found());
    }
    Ok(parts.join("/"))
}

fn lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}
