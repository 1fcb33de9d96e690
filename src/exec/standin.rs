// src/exec/standin.rs

//! Stand-in swap: before a build starts, the build's output binary is
//! replaced with a tiny placeholder program, so anything invoking the target
//! mid-build runs the placeholder instead of a half-written file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::fs::FileSystem;

/// Copy the `stand_in` program over `target`.
///
/// The copy goes to [`staging_path`] first and is renamed into place, so
/// `target` is never observed half-copied. Returns the resolved stand-in.
pub fn swap_in_stand_in(fs: &dyn FileSystem, stand_in: &str, target: &Path) -> Result<PathBuf> {
    let source = which::which(stand_in)
        .with_context(|| format!("could not find '{stand_in}' in PATH"))?;
    let staging = staging_path(target);
    fs.copy(&source, &staging)?;
    fs.rename(&staging, target)?;
    Ok(source)
}

/// Sibling of `target` used while copying the stand-in.
pub fn staging_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".standin");
    target.with_file_name(name)
}
