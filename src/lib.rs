// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod report;
pub mod types;
pub mod watch;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::{generate_starter, load_and_validate, resolve_config_path, Config};
use crate::engine::{Orchestrator, OrchestratorEvent, OrchestratorOptions};
use crate::errors::Result;
use crate::exec::{staging_path, CommandLauncher};
use crate::fs::{FileSystem, RealFileSystem};
use crate::report::StatusReporter;

/// Capacity of the orchestrator's event channel. When full, the watcher
/// waits rather than dropping change events.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config discovery, loading and `--generate` / `--dry-run`
/// - the change source
/// - the build launcher and status reporter
/// - shutdown signal handling
/// - the orchestrator loop
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let cwd = std::env::current_dir()?;

    if args.generate {
        let path = generate_starter(fs.as_ref(), &cwd)?;
        println!("wrote starter config to {}", path.display());
        return Ok(());
    }

    let config_path = resolve_config_path(fs.as_ref(), args.config.as_deref(), &cwd)?;
    let config = Arc::new(load_and_validate(fs.as_ref(), &config_path)?);

    if args.dry_run {
        write_dry_run(&mut std::io::stdout().lock(), &config)?;
        return Ok(());
    }

    log_config(&config);

    let (tx, rx) = mpsc::channel::<OrchestratorEvent>(EVENT_CHANNEL_CAPACITY);

    // Failing to watch is fatal; this happens before the first build.
    let _change_source =
        watch::spawn_change_source(&config.watch_dir, owned_paths(&config), tx.clone())?;

    // The build runs in its own process group and never sees signals aimed
    // at us, so the orchestrator has to stop it on the way out.
    forward_shutdown_signals(tx.clone())?;

    let reporter = StatusReporter::from_config(&config, Arc::clone(&fs));
    let launcher = CommandLauncher::new(Arc::clone(&config), fs);
    let options = OrchestratorOptions {
        single_run: args.once,
    };

    Orchestrator::new(launcher, reporter, rx, options).run().await
}

/// Turn the first Ctrl-C (and, on Unix, SIGTERM or SIGHUP) into
/// [`OrchestratorEvent::ShutdownRequested`].
///
/// Unix handlers are installed before this returns. Must be called from
/// within a tokio runtime.
pub fn forward_shutdown_signals(tx: mpsc::Sender<OrchestratorEvent>) -> Result<JoinHandle<()>> {
    #[cfg(unix)]
    let (mut term, mut hup) = {
        use tokio::signal::unix::{signal, SignalKind};
        (
            signal(SignalKind::terminate())?,
            signal(SignalKind::hangup())?,
        )
    };

    Ok(tokio::spawn(async move {
        #[cfg(unix)]
        let received = tokio::select! {
            res = tokio::signal::ctrl_c() => res.map(|()| "SIGINT"),
            _ = term.recv() => Ok("SIGTERM"),
            _ = hup.recv() => Ok("SIGHUP"),
        };
        #[cfg(not(unix))]
        let received = tokio::signal::ctrl_c().await.map(|()| "Ctrl-C");

        match received {
            Ok(signal) => {
                info!(signal, "shutdown signal received");
                let _ = tx.send(OrchestratorEvent::ShutdownRequested).await;
            }
            Err(e) => warn!(error = %e, "failed to listen for shutdown signals"),
        }
    }))
}

/// Files the orchestrator writes itself; changes to them must not trigger a
/// rebuild.
pub fn owned_paths(config: &Config) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(status) = &config.status_file {
        paths.push(status.clone());
    }
    if let Some(target) = &config.build_file {
        paths.push(target.clone());
        paths.push(staging_path(target));
    }
    paths
}

fn log_config(config: &Config) {
    info!(
        config = %config.config_path.display(),
        watch_dir = %config.watch_dir.display(),
        build_cmd = %config.build_cmd,
        build_cmd_dir = %config.build_cmd_dir.display(),
        status_file = %display_opt(config.status_file.as_deref()),
        build_file = %display_opt(config.build_file.as_deref()),
        status_bar_port = ?config.status_bar_port,
        "loaded config"
    );
}

/// Dry-run report: the resolved config, one value per entry.
pub fn write_dry_run(out: &mut dyn Write, config: &Config) -> std::io::Result<()> {
    writeln!(out, "builderator dry-run")?;
    writeln!(out, "Config path:\n  {}", config.config_path.display())?;
    writeln!(out, "WatchDir:\n  {}", config.watch_dir.display())?;
    writeln!(out, "BuildCmd:\n  {}", config.build_cmd)?;
    writeln!(out, "BuildCmdDir:\n  {}", config.build_cmd_dir.display())?;
    writeln!(out, "StatusFile: {}", display_opt(config.status_file.as_deref()))?;
    writeln!(out, "BuildFile: {}", display_opt(config.build_file.as_deref()))?;
    if config.build_file.is_some() {
        writeln!(out, "StandIn: {}", config.stand_in)?;
    }
    match config.status_bar_port {
        Some(port) => writeln!(out, "StatusBarPort: {port}")?,
        None => writeln!(out, "StatusBarPort: None")?,
    }
    writeln!(out)?;
    writeln!(out, "Dryrun complete")
}

fn display_opt(path: Option<&Path>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "None".to_string(),
    }
}
