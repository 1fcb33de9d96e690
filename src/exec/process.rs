// src/exec/process.rs

//! One OS-level build process.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::types::BuildResult;

/// Resolves once the build process has exited *and been reaped*.
pub type ExitFuture = Pin<Box<dyn Future<Output = BuildResult> + Send>>;

/// Capability to stop a build and everything it spawned.
///
/// Delivery is best effort: if the tree is already gone, or the signal
/// cannot be delivered, this is a no-op. The natural exit path will deliver
/// (or already has delivered) the result.
pub trait ProcessTree: Send + Sync {
    fn terminate(&self);
}

/// A launched build: the handle to stop it and the future that reaps it.
pub struct SpawnedBuild {
    pub tree: Arc<dyn ProcessTree>,
    pub exit: ExitFuture,
}

impl std::fmt::Debug for SpawnedBuild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnedBuild").finish_non_exhaustive()
    }
}

/// Build a shell command appropriate for the platform: `cmd /C` on
/// Windows, `sh -c` everywhere else.
pub fn shell_command(build_cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(build_cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(build_cmd);
        c
    }
}

/// Spawn `config.build_cmd` through the platform shell in
/// `config.build_cmd_dir`.
///
/// On Unix the child leads a fresh process group so that terminating the
/// build reaches compilers and sub-builds without touching this process.
pub fn spawn_build(config: &Config) -> Result<SpawnedBuild> {
    let mut cmd = shell_command(&config.build_cmd);
    cmd.current_dir(&config.build_cmd_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    let child = cmd.spawn().with_context(|| {
        format!(
            "spawning `{}` in {}",
            config.build_cmd,
            config.build_cmd_dir.display()
        )
    })?;

    let pid = child.id();
    info!(?pid, cmd = %config.build_cmd, "build process started");

    Ok(SpawnedBuild {
        tree: Arc::new(ProcessGroup::new(pid)),
        exit: Box::pin(collect_exit(child)),
    })
}

/// Wait for `child` and fold its buffered output into a [`BuildResult`].
///
/// Output is stdout followed by stderr; no interleaving is reconstructed.
async fn collect_exit(child: Child) -> BuildResult {
    match child.wait_with_output().await {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            debug!(
                exit_code = ?output.status.code(),
                success = output.status.success(),
                "build process reaped"
            );
            BuildResult {
                success: output.status.success(),
                output: text,
            }
        }
        Err(e) => {
            warn!(error = %e, "failed waiting for build process");
            BuildResult::failure(format!("waiting for build process: {e}"))
        }
    }
}

/// The process group led by a spawned build.
#[derive(Debug, Clone, Copy)]
pub struct ProcessGroup {
    pid: Option<u32>,
}

impl ProcessGroup {
    pub fn new(pid: Option<u32>) -> Self {
        Self { pid }
    }
}

impl ProcessTree for ProcessGroup {
    #[cfg(unix)]
    fn terminate(&self) {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::{getpgid, getpgrp, Pid};

        let Some(raw) = self.pid.and_then(|pid| i32::try_from(pid).ok()) else {
            debug!("build process has no pid; nothing to signal");
            return;
        };

        let pgid = match getpgid(Some(Pid::from_raw(raw))) {
            Ok(pgid) => pgid,
            Err(e) => {
                debug!(pid = raw, error = %e, "process group lookup failed; build already gone");
                return;
            }
        };

        if pgid == getpgrp() {
            warn!(pid = raw, "build shares our process group; refusing to signal it");
            return;
        }

        match killpg(pgid, Signal::SIGTERM) {
            Ok(()) => debug!(pgid = %pgid, "sent SIGTERM to build process group"),
            Err(e) => debug!(pgid = %pgid, error = %e, "could not signal build process group"),
        }
    }

    /// `taskkill /T` walks the child's descendants, which is the closest
    /// Windows has to a process group.
    #[cfg(not(unix))]
    fn terminate(&self) {
        let Some(pid) = self.pid else {
            debug!("build process has no pid; nothing to signal");
            return;
        };

        let spawned = std::process::Command::new("taskkill")
            .args(["/T", "/F", "/PID", &pid.to_string()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(_) => debug!(pid, "requested taskkill of build process tree"),
            Err(e) => warn!(pid, error = %e, "could not run taskkill for build process tree"),
        }
    }
}
