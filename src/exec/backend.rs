// src/exec/backend.rs

//! Pluggable launcher abstraction.
//!
//! The orchestrator never spawns processes itself; it asks a
//! [`BuildLauncher`] for a [`SpawnedBuild`]. Production code uses
//! [`CommandLauncher`]; tests provide a launcher whose builds start and stop
//! on command.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::config::Config;
use crate::exec::process::{spawn_build, SpawnedBuild};
use crate::exec::standin::swap_in_stand_in;
use crate::fs::FileSystem;
use crate::types::BuildId;

/// Trait abstracting how a build is started.
pub trait BuildLauncher: Send + Sync {
    /// Start build `id` synchronously.
    ///
    /// `Err` means the build never started; the session turns it into an
    /// unsuccessful result rather than failing the orchestrator.
    fn launch(&self, id: BuildId) -> Result<SpawnedBuild>;
}

/// Launcher that runs the configured build command.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    config: Arc<Config>,
    fs: Arc<dyn FileSystem>,
}

impl CommandLauncher {
    pub fn new(config: Arc<Config>, fs: Arc<dyn FileSystem>) -> Self {
        Self { config, fs }
    }
}

impl BuildLauncher for CommandLauncher {
    fn launch(&self, id: BuildId) -> Result<SpawnedBuild> {
        if let Some(target) = &self.config.build_file {
            match swap_in_stand_in(self.fs.as_ref(), &self.config.stand_in, target) {
                Ok(source) => debug!(
                    build = id,
                    stand_in = %source.display(),
                    target = %target.display(),
                    "replaced build target with stand-in"
                ),
                Err(e) => warn!(
                    build = id,
                    target = %target.display(),
                    error = %format!("{e:#}"),
                    "could not replace build target with stand-in"
                ),
            }
        }

        spawn_build(&self.config)
    }
}
