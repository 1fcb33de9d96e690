// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::model::{Config, RawConfig};
use crate::config::validate::reroot_path;
use crate::errors::{BuilderatorError, Result};
use crate::fs::FileSystem;

/// File name looked up by config discovery.
pub const CONFIG_FILE_NAME: &str = ".builderator.toml";

/// How many directories (the starting one included) discovery inspects.
pub const DISCOVERY_DEPTH: usize = 64;

/// Written by `builderator --generate`.
pub const STARTER_CONFIG: &str = r#"# All relative paths are relative to this config file.

# Directory to watch for changes.
WatchDir    = "."

# Command to run when files change. (Can be a script like "./compile.sh")
BuildCmd    = "cargo build"

# (Optional) Working directory for BuildCmd.
BuildCmdDir = "."

# (Optional) File to write build status and output to.
StatusFile  = "/tmp/buildstatus-builderator"

# (Optional) Target binary to replace with a stand-in before each build.
# BuildFile   = "~/.cargo/bin/myapp"

# (Optional) Stand-in program copied over BuildFile. Defaults to "justasec".
# StandIn     = "justasec"

# (Optional) UDP port of a status indicator (e.g. AnyBar).
# StatusBarPort = 1738
"#;

/// Read and deserialize a config file without validating it.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfig> {
    let contents = fs.read_to_string(path.as_ref())?;
    let config: RawConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a config file and resolve it into a [`Config`].
///
/// `path` must be absolute; see [`resolve_config_path`].
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<Config> {
    let raw = load_from_path(fs, &path)?;
    Config::from_raw(raw, path.as_ref())
}

/// Walk up from `start` looking for [`CONFIG_FILE_NAME`].
///
/// `limit` is how many directories to inspect; `1` only looks in `start`.
pub fn find_config(fs: &dyn FileSystem, start: &Path, limit: usize) -> Result<PathBuf> {
    let mut dir = Some(start);
    for _ in 0..limit {
        let Some(current) = dir else { break };
        let candidate = current.join(CONFIG_FILE_NAME);
        if fs.is_file(&candidate) {
            return Ok(candidate);
        }
        dir = current.parent();
    }
    Err(BuilderatorError::ConfigNotFound {
        name: CONFIG_FILE_NAME.to_string(),
    })
}

/// Pick the config file: an explicit `--config` (relative to `cwd`) wins,
/// otherwise discovery from `cwd`.
pub fn resolve_config_path(
    fs: &dyn FileSystem,
    explicit: Option<&str>,
    cwd: &Path,
) -> Result<PathBuf> {
    match explicit {
        Some(path) => reroot_path(path, cwd),
        None => find_config(fs, cwd, DISCOVERY_DEPTH),
    }
}

/// Write [`STARTER_CONFIG`] into `dir`, refusing to overwrite an existing one.
pub fn generate_starter(fs: &dyn FileSystem, dir: &Path) -> Result<PathBuf> {
    match find_config(fs, dir, 1) {
        Ok(existing) => {
            return Err(BuilderatorError::ConfigError(format!(
                "config already exists in this directory: {}",
                existing.display()
            )));
        }
        Err(BuilderatorError::ConfigNotFound { .. }) => {}
        Err(other) => return Err(other),
    }

    let path = dir.join(CONFIG_FILE_NAME);
    fs.write(&path, STARTER_CONFIG.as_bytes())?;
    Ok(path)
}
