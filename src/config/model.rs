// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Stand-in program copied over `BuildFile` before each build.
pub const DEFAULT_STAND_IN: &str = "justasec";

/// Configuration exactly as read from `.builderator.toml`.
///
/// ```toml
/// WatchDir      = "."
/// BuildCmd      = "go install"
/// BuildCmdDir   = "."
/// StatusFile    = "/tmp/buildstatus-builderator"
/// BuildFile     = "~/go/bin/builderator"
/// StatusBarPort = 1738
/// ```
///
/// Paths may be relative to the config file, start with `~`, or reference
/// environment variables. Nothing is checked until [`Config::from_raw`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawConfig {
    pub watch_dir: Option<String>,
    pub build_cmd: Option<String>,
    pub build_cmd_dir: Option<String>,
    pub status_file: Option<String>,
    pub build_file: Option<String>,

    /// UDP port of the status indicator; `0` disables it.
    #[serde(default)]
    pub status_bar_port: u16,

    /// Program (name on `PATH`, or a path) used for the stand-in swap.
    pub stand_in: Option<String>,
}

/// Validated configuration. Every path is absolute and cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute path to the config file this was loaded from.
    pub config_path: PathBuf,

    pub watch_dir: PathBuf,
    pub build_cmd: String,
    pub build_cmd_dir: PathBuf,
    pub status_file: Option<PathBuf>,

    /// Build output that gets the stand-in copied over it before each build.
    pub build_file: Option<PathBuf>,

    pub status_bar_port: Option<u16>,
    pub stand_in: String,
}

impl Config {
    /// Directory containing the config file; relative paths resolve here.
    pub fn config_dir(&self) -> &Path {
        self.config_path.parent().unwrap_or(Path::new("/"))
    }
}
