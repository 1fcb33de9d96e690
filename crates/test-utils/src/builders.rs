#![allow(dead_code)]

use std::path::{Path, PathBuf};

use builderator::config::{Config, DEFAULT_STAND_IN};

/// Builder for a validated `Config` rooted at one directory.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Watch and build in `dir`, running `true` as the build command.
    pub fn new(dir: &Path) -> Self {
        Self {
            config: Config {
                config_path: dir.join(".builderator.toml"),
                watch_dir: dir.to_path_buf(),
                build_cmd: "true".to_string(),
                build_cmd_dir: dir.to_path_buf(),
                status_file: None,
                build_file: None,
                status_bar_port: None,
                stand_in: DEFAULT_STAND_IN.to_string(),
            },
        }
    }

    pub fn build_cmd(mut self, cmd: &str) -> Self {
        self.config.build_cmd = cmd.to_string();
        self
    }

    pub fn build_cmd_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.build_cmd_dir = dir.into();
        self
    }

    pub fn status_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.status_file = Some(path.into());
        self
    }

    pub fn build_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.build_file = Some(path.into());
        self
    }

    pub fn stand_in(mut self, program: &str) -> Self {
        self.config.stand_in = program.to_string();
        self
    }

    pub fn status_bar_port(mut self, port: u16) -> Self {
        self.config.status_bar_port = Some(port);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
