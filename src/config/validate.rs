// src/config/validate.rs

use std::path::{Component, Path, PathBuf};

use crate::config::model::{Config, RawConfig, DEFAULT_STAND_IN};
use crate::errors::{BuilderatorError, Result};

impl Config {
    /// Validate `raw` and resolve its paths relative to `config_path`.
    pub fn from_raw(raw: RawConfig, config_path: &Path) -> Result<Config> {
        if !config_path.is_absolute() {
            return Err(BuilderatorError::ConfigError(format!(
                "config path must be absolute: {}",
                config_path.display()
            )));
        }
        let config_path = clean_path(config_path);
        let config_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let watch_dir = required(raw.watch_dir, "WatchDir")?;
        let watch_dir = reroot_path(&watch_dir, &config_dir)?;

        let build_cmd = required(raw.build_cmd, "BuildCmd")?;
        if build_cmd.trim().is_empty() {
            return Err(BuilderatorError::ConfigError(
                "BuildCmd must not be empty".to_string(),
            ));
        }

        let build_cmd_dir = match raw.build_cmd_dir {
            Some(dir) => reroot_path(&dir, &config_dir)?,
            None => config_dir.clone(),
        };

        let status_file = raw
            .status_file
            .map(|p| reroot_path(&p, &config_dir))
            .transpose()?;
        let build_file = raw
            .build_file
            .map(|p| reroot_path(&p, &config_dir))
            .transpose()?;

        let status_bar_port = (raw.status_bar_port > 0).then_some(raw.status_bar_port);

        let stand_in = raw
            .stand_in
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STAND_IN.to_string());

        Ok(Config {
            config_path,
            watch_dir,
            build_cmd,
            build_cmd_dir,
            status_file,
            build_file,
            status_bar_port,
            stand_in,
        })
    }
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    value.ok_or_else(|| {
        BuilderatorError::ConfigError(format!("missing required config value: {key}"))
    })
}

/// Make `raw` absolute.
///
/// `~` and `$VAR` are expanded first; a path that is still relative is then
/// taken relative to `relative_to`.
pub fn reroot_path(raw: &str, relative_to: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).map_err(|e| {
        BuilderatorError::ConfigError(format!("cannot expand path '{raw}': {e}"))
    })?;
    let path = Path::new(expanded.as_ref());
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        relative_to.join(path)
    };
    Ok(clean_path(&joined))
}

/// Lexically normalise an absolute path: drop `.` and resolve `..`.
///
/// Symlinks are not consulted; `..` above the root stays at the root.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}
