// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::{Path, PathBuf};

/// Whether `a` and `b` name the same file.
///
/// Tries a direct comparison first. If that fails (e.g. one side goes
/// through a symlinked directory such as macOS's `/private/var`), the parent
/// directories are canonicalized and compared with the file names re-attached.
/// The files themselves need not exist.
pub fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (canonical_parent_join(a), canonical_parent_join(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Whether `path` is one of `ignored`.
pub fn is_ignored(path: &Path, ignored: &[PathBuf]) -> bool {
    ignored.iter().any(|candidate| same_path(path, candidate))
}

fn canonical_parent_join(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = path.parent()?.canonicalize().ok()?;
    Some(parent.join(name))
}
