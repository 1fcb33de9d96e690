// src/exec/session.rs

//! One build in progress.
//!
//! A [`BuildSession`] owns a launched build and two watcher tasks:
//!
//! - the *completion watcher* awaits the process exit (which reaps it) and
//!   then tries to deliver the natural result;
//! - the *abort watcher* waits for an abort request, claims delivery,
//!   terminates the process tree, waits until the completion watcher has
//!   reaped the process, and only then delivers the canceled result.
//!
//! Both paths go through a shared [`DeliveryGuard`]. Whoever claims it first
//! delivers; the other path drops its result. The result channel therefore
//! carries exactly one value per session, and that value is never sent
//! before the process has been reaped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::exec::backend::BuildLauncher;
use crate::exec::process::{ExitFuture, ProcessTree};
use crate::types::{BuildId, BuildResult};

/// Single-fire checkpoint shared by the two delivery paths.
#[derive(Debug)]
struct DeliveryGuard {
    claimed: AtomicBool,
    tx: mpsc::Sender<BuildResult>,
}

impl DeliveryGuard {
    fn new(tx: mpsc::Sender<BuildResult>) -> Self {
        Self {
            claimed: AtomicBool::new(false),
            tx,
        }
    }

    /// Returns `true` for exactly one caller.
    fn claim(&self) -> bool {
        !self.claimed.swap(true, Ordering::AcqRel)
    }

    /// Send the result. Only the holder of the claim may call this.
    fn deliver(&self, id: BuildId, result: BuildResult) {
        // Capacity 1 and a single sender: this only fails if the session
        // was dropped without reading its result.
        if self.tx.try_send(result).is_err() {
            debug!(build = id, "session dropped before its result was read");
        }
    }
}

/// A build in progress.
///
/// The underlying process has been launched by the time [`BuildSession::start`]
/// returns. Exactly one [`BuildResult`] is ever produced on the session.
pub struct BuildSession {
    id: BuildId,
    result_rx: mpsc::Receiver<BuildResult>,
    abort_tx: Option<mpsc::Sender<()>>,
    abort_requested: bool,
    watchers: JoinSet<()>,
}

impl std::fmt::Debug for BuildSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildSession")
            .field("id", &self.id)
            .field("abort_requested", &self.abort_requested)
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

impl BuildSession {
    /// Launch build `id` and start its watchers.
    ///
    /// If the launcher fails, the session is created already holding an
    /// unsuccessful result and has no watchers.
    pub fn start(launcher: &dyn BuildLauncher, id: BuildId) -> Self {
        let (result_tx, result_rx) = mpsc::channel::<BuildResult>(1);
        let (abort_tx, abort_rx) = mpsc::channel::<()>(1);
        let mut watchers = JoinSet::new();

        match launcher.launch(id) {
            Ok(spawned) => {
                let guard = Arc::new(DeliveryGuard::new(result_tx));
                let (reaped_tx, reaped_rx) = oneshot::channel::<()>();

                watchers.spawn(completion_watcher(
                    id,
                    spawned.exit,
                    reaped_tx,
                    Arc::clone(&guard),
                ));
                watchers.spawn(abort_watcher(id, abort_rx, spawned.tree, reaped_rx, guard));
            }
            Err(err) => {
                let err = format!("{err:#}");
                warn!(build = id, error = %err, "build failed to start");
                // Buffered: the value stays readable after the sender drops.
                let _ = result_tx.try_send(BuildResult::failed_to_start(err));
            }
        }

        Self {
            id,
            result_rx,
            abort_tx: Some(abort_tx),
            abort_requested: false,
            watchers,
        }
    }

    pub fn id(&self) -> BuildId {
        self.id
    }

    /// Whether [`abort`](Self::abort) has been called on this session.
    pub fn abort_requested(&self) -> bool {
        self.abort_requested
    }

    /// Request cancellation. Never blocks; repeated calls are no-ops.
    pub fn abort(&mut self) {
        if self.abort_requested {
            return;
        }
        self.abort_requested = true;
        if let Some(tx) = &self.abort_tx {
            // Full or closed both mean there is nothing more to do.
            let _ = tx.try_send(());
        }
    }

    /// Wait for the session's result.
    ///
    /// Yields the result once; afterwards it resolves to `None` as soon as
    /// both watchers have retired. Cancel safe.
    pub async fn recv_result(&mut self) -> Option<BuildResult> {
        self.result_rx.recv().await
    }

    /// Tear the session down once its result has been observed: release the
    /// abort control and wait for both watchers to finish.
    pub async fn retire(mut self) {
        self.abort_tx.take();
        while let Some(joined) = self.watchers.join_next().await {
            if let Err(e) = joined {
                warn!(build = self.id, error = %e, "session watcher task failed");
            }
        }
        debug!(build = self.id, "session retired");
    }
}

async fn completion_watcher(
    id: BuildId,
    exit: ExitFuture,
    reaped_tx: oneshot::Sender<()>,
    guard: Arc<DeliveryGuard>,
) {
    let result = exit.await;
    let _ = reaped_tx.send(());

    if guard.claim() {
        debug!(build = id, success = result.success, "build finished");
        guard.deliver(id, result);
    } else {
        debug!(build = id, "build exited after cancellation; dropping its result");
    }
}

async fn abort_watcher(
    id: BuildId,
    mut abort_rx: mpsc::Receiver<()>,
    tree: Arc<dyn ProcessTree>,
    mut reaped_rx: oneshot::Receiver<()>,
    guard: Arc<DeliveryGuard>,
) {
    if abort_rx.recv().await.is_none() {
        // Session retired without an abort.
        return;
    }

    if !guard.claim() {
        debug!(build = id, "abort requested after the build finished; nothing to cancel");
        return;
    }

    info!(build = id, "canceling build");
    match reaped_rx.try_recv() {
        // Its pid may already belong to someone else.
        Ok(()) | Err(TryRecvError::Closed) => {
            debug!(build = id, "build already reaped; not signaling it");
        }
        Err(TryRecvError::Empty) => {
            tree.terminate();
            // The canceled result must not be visible before the process is
            // reaped.
            let _ = reaped_rx.await;
        }
    }
    guard.deliver(id, BuildResult::canceled());
}
