// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::OrchestratorEvent;
use crate::errors::Result;
use crate::watch::path_utils::is_ignored;

/// Window within which filesystem events collapse into one change event.
pub const DEBOUNCE: Duration = Duration::from_millis(100);

/// Handle for the change source.
///
/// Keeps the underlying debouncer alive; dropping this handle stops watching
/// and lets the bridge task finish.
pub struct ChangeSourceHandle {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    _bridge: JoinHandle<()>,
}

impl std::fmt::Debug for ChangeSourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSourceHandle").finish()
    }
}

/// Watch `watch_dir` recursively and send one `FilesChanged` per debounced
/// batch into `tx`.
///
/// Batches made up only of `ignored` paths are dropped. Failing to start the
/// watcher is returned as an error; there is nothing useful to do without it.
pub fn spawn_change_source(
    watch_dir: &Path,
    ignored: Vec<PathBuf>,
    tx: mpsc::Sender<OrchestratorEvent>,
) -> Result<ChangeSourceHandle> {
    // Channel from the blocking debouncer callback into the async world.
    let (std_tx, std_rx) = std::sync::mpsc::channel::<DebounceEventResult>();

    let mut debouncer = new_debouncer(DEBOUNCE, move |res| {
        let _ = std_tx.send(res);
    })?;
    debouncer
        .watcher()
        .watch(watch_dir, RecursiveMode::Recursive)?;

    info!(dir = %watch_dir.display(), "watching for changes");

    let bridge = tokio::task::spawn_blocking(move || {
        while let Ok(res) = std_rx.recv() {
            match res {
                Ok(events) => {
                    let relevant = events
                        .iter()
                        .filter(|event| !is_ignored(&event.path, &ignored))
                        .count();
                    if relevant == 0 {
                        debug!(events = events.len(), "ignoring batch of orchestrator-owned paths");
                        continue;
                    }
                    debug!(paths = relevant, "debounced change batch");
                    // Blocks while the orchestrator drains a canceled build;
                    // changes queue up rather than being dropped.
                    if tx.blocking_send(OrchestratorEvent::FilesChanged).is_err() {
                        break;
                    }
                }
                Err(err) => warn!(error = %err, "file watch error"),
            }
        }
        debug!("change source bridge finished");
    });

    Ok(ChangeSourceHandle {
        _debouncer: debouncer,
        _bridge: bridge,
    })
}
