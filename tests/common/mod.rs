#![allow(dead_code, unused_imports)]

pub use builderator_test_utils::{
    init_tracing, wait_until, with_timeout, BuildSpan, ConfigBuilder, FakeLauncher,
    RecordingSink,
};

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use builderator::engine::{Orchestrator, OrchestratorEvent, OrchestratorOptions};
use builderator::errors::Result;
use builderator::report::StatusReporter;

pub type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// An orchestrator running in the background on a [`FakeLauncher`].
pub struct Harness {
    pub launcher: FakeLauncher,
    pub sink: RecordingSink,
    pub tx: mpsc::Sender<OrchestratorEvent>,
    pub handle: JoinHandle<Result<()>>,
}

impl Harness {
    pub fn spawn(single_run: bool) -> Self {
        Self::spawn_with(FakeLauncher::new(), single_run)
    }

    pub fn spawn_with(launcher: FakeLauncher, single_run: bool) -> Self {
        let sink = RecordingSink::new();
        let reporter = StatusReporter::new().with_sink(Arc::new(sink.clone()));
        let (tx, rx) = mpsc::channel(64);
        let orchestrator =
            Orchestrator::new(launcher.clone(), reporter, rx, OrchestratorOptions { single_run });
        let handle = tokio::spawn(orchestrator.run());
        Self {
            launcher,
            sink,
            tx,
            handle,
        }
    }

    pub async fn change(&self) {
        self.tx
            .send(OrchestratorEvent::FilesChanged)
            .await
            .expect("orchestrator stopped listening");
    }

    pub async fn wait_started(&self, n: usize) {
        let launcher = self.launcher.clone();
        wait_until(&format!("{n} builds started"), move || launcher.started().len() >= n).await;
    }

    pub async fn wait_results(&self, n: usize) {
        let sink = self.sink.clone();
        wait_until(&format!("{n} results reported"), move || sink.results().len() >= n).await;
    }

    /// Request shutdown and wait for the loop to finish.
    pub async fn shutdown(self) -> (FakeLauncher, RecordingSink) {
        let _ = self.tx.send(OrchestratorEvent::ShutdownRequested).await;
        with_timeout(self.handle)
            .await
            .expect("orchestrator panicked")
            .expect("orchestrator failed");
        (self.launcher, self.sink)
    }
}
