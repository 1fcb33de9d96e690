// src/engine/orchestrator.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::state::BuildState;
use crate::engine::{OrchestratorEvent, OrchestratorOptions};
use crate::errors::Result;
use crate::exec::{BuildLauncher, BuildSession};
use crate::report::{BuildStatus, StatusReporter};
use crate::types::{BuildId, BuildResult};

/// What woke the loop up.
enum Wake {
    Event(Option<OrchestratorEvent>),
    Finished(Option<BuildResult>),
}

/// Drives builds in response to change events, keeping at most one build
/// alive at a time.
///
/// A change that arrives mid-build aborts the session and *synchronously
/// drains* its result before anything else happens: the next build never
/// starts while the previous process group is still alive. Changes that pile
/// up during the drain stay queued in the event channel and are handled one
/// at a time afterwards.
pub struct Orchestrator<L: BuildLauncher> {
    launcher: L,
    reporter: StatusReporter,
    events: mpsc::Receiver<OrchestratorEvent>,
    options: OrchestratorOptions,
    state: BuildState,
    last_id: BuildId,
}

impl<L: BuildLauncher> fmt::Debug for Orchestrator<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &self.state)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<L: BuildLauncher> Orchestrator<L> {
    pub fn new(
        launcher: L,
        reporter: StatusReporter,
        events: mpsc::Receiver<OrchestratorEvent>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            launcher,
            reporter,
            events,
            options,
            state: BuildState::Idle,
            last_id: 0,
        }
    }

    /// Main event loop.
    ///
    /// Starts the first build immediately, then runs until shutdown is
    /// requested, the event channel closes, or (in single-run mode) the
    /// first result has been reported. Any build still alive on the way out
    /// is canceled and drained.
    pub async fn run(mut self) -> Result<()> {
        info!(single_run = self.options.single_run, "builderator orchestrator started");
        self.start_build();

        loop {
            let wake = match &mut self.state {
                BuildState::Building(session) => tokio::select! {
                    // A result that is already in wins over a change, so a
                    // finished build is reported as finished.
                    biased;
                    result = session.recv_result() => Wake::Finished(result),
                    event = self.events.recv() => Wake::Event(event),
                },
                _ => Wake::Event(self.events.recv().await),
            };

            match wake {
                Wake::Finished(result) => {
                    self.finish_current(result).await;
                    if self.options.single_run {
                        break;
                    }
                }
                Wake::Event(Some(OrchestratorEvent::FilesChanged)) => {
                    info!("files changed");
                    let interrupted = self.cancel_current().await;
                    if interrupted.is_some() && self.options.single_run {
                        break;
                    }
                    self.start_build();
                }
                Wake::Event(Some(OrchestratorEvent::ShutdownRequested)) => {
                    info!("shutdown requested");
                    self.cancel_current().await;
                    break;
                }
                Wake::Event(None) => {
                    info!("event channel closed; stopping");
                    self.cancel_current().await;
                    break;
                }
            }
        }

        info!("orchestrator exiting");
        Ok(())
    }

    /// IDLE → BUILDING.
    fn start_build(&mut self) {
        debug_assert!(matches!(self.state, BuildState::Idle));
        self.last_id += 1;
        let id = self.last_id;

        self.reporter.publish(&BuildStatus::Building);
        info!(build = id, "starting build");

        let session = BuildSession::start(&self.launcher, id);
        self.state = BuildState::Building(session);
    }

    /// BUILDING → IDLE on a natural result.
    async fn finish_current(&mut self, result: Option<BuildResult>) {
        let Some(session) = self.state.take_session() else {
            return;
        };
        let result = result.unwrap_or_else(|| missing_result(session.id()));
        self.report(session.id(), &result);
        session.retire().await;
    }

    /// BUILDING → CANCELING → IDLE.
    ///
    /// Requests abort, waits for the session's terminal result, reports it
    /// and retires the session. Returns `None` if nothing was building.
    async fn cancel_current(&mut self) -> Option<BuildResult> {
        if !self.state.begin_cancel() {
            return None;
        }
        self.reporter.publish(&BuildStatus::Canceling);

        let drained = match self.state.session_mut() {
            Some(session) => session.recv_result().await,
            None => None,
        };

        let session = self.state.take_session()?;
        let result = drained.unwrap_or_else(|| missing_result(session.id()));
        self.report(session.id(), &result);
        session.retire().await;
        Some(result)
    }

    fn report(&self, id: BuildId, result: &BuildResult) {
        if result.success {
            info!(build = id, "✓ build succeeded");
        } else if result.is_canceled() {
            info!(build = id, "✗ build canceled");
        } else {
            warn!(build = id, output = %result.output, "✗ build failed");
        }
        self.reporter.publish(&BuildStatus::Finished(result.clone()));
    }
}

/// Stand-in for a session whose watchers vanished without delivering.
fn missing_result(id: BuildId) -> BuildResult {
    debug!(build = id, "session ended without a result");
    BuildResult::failure("Build ended without a result")
}
