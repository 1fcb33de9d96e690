use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::oneshot;

use builderator::exec::{BuildLauncher, ProcessTree, SpawnedBuild};
use builderator::types::{BuildId, BuildResult};

/// Start/stop record of one fake build.
///
/// `stopped` is set when the build's exit has been observed, i.e. the moment
/// a real process would have been reaped.
#[derive(Debug, Clone)]
pub struct BuildSpan {
    pub id: BuildId,
    pub started: Instant,
    pub stopped: Option<Instant>,
    pub terminated: bool,
}

#[derive(Debug, Default)]
struct Inner {
    spans: Vec<BuildSpan>,
    pending: HashMap<BuildId, oneshot::Sender<BuildResult>>,
    live: usize,
    max_live: usize,
    fail_to_start: bool,
    ignore_terminate: bool,
}

/// An instrumented launcher whose builds run until the test says otherwise.
///
/// - [`complete`](Self::complete) makes a build exit with a given result.
/// - Terminating a build makes it exit at once with some partial output,
///   unless [`ignore_terminate`](Self::ignore_terminate) is set.
/// - Start/stop instants and the peak number of live builds are recorded.
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    inner: Arc<Mutex<Inner>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent launch fail as if the command could not spawn.
    pub fn fail_to_start(&self, fail: bool) {
        self.inner.lock().unwrap().fail_to_start = fail;
    }

    /// Make termination a no-op: builds only exit through `complete`.
    pub fn ignore_terminate(&self, ignore: bool) {
        self.inner.lock().unwrap().ignore_terminate = ignore;
    }

    /// Ids of every build launched so far, in order.
    pub fn started(&self) -> Vec<BuildId> {
        self.inner.lock().unwrap().spans.iter().map(|s| s.id).collect()
    }

    pub fn spans(&self) -> Vec<BuildSpan> {
        self.inner.lock().unwrap().spans.clone()
    }

    /// Ids of builds that received a termination request.
    pub fn terminated(&self) -> Vec<BuildId> {
        self.inner
            .lock()
            .unwrap()
            .spans
            .iter()
            .filter(|s| s.terminated)
            .map(|s| s.id)
            .collect()
    }

    /// The build still waiting to exit, if any.
    pub fn running(&self) -> Option<BuildId> {
        self.inner.lock().unwrap().pending.keys().copied().min()
    }

    /// Builds launched and not yet exited.
    pub fn live(&self) -> usize {
        self.inner.lock().unwrap().live
    }

    /// Highest number of simultaneously live builds ever observed.
    pub fn max_live(&self) -> usize {
        self.inner.lock().unwrap().max_live
    }

    /// Let build `id` exit with `result`. Returns `false` if it already had.
    pub fn complete(&self, id: BuildId, result: BuildResult) -> bool {
        let tx = self.inner.lock().unwrap().pending.remove(&id);
        match tx {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }

    /// Panics unless every build stopped before the next one started.
    pub fn assert_no_overlap(&self) {
        let mut spans = self.spans();
        spans.sort_by_key(|s| s.started);
        for pair in spans.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let stopped = prev
                .stopped
                .unwrap_or_else(|| panic!("build {} still live when {} started", prev.id, next.id));
            assert!(
                stopped <= next.started,
                "build {} overlapped build {}",
                prev.id,
                next.id
            );
        }
    }
}

impl BuildLauncher for FakeLauncher {
    fn launch(&self, id: BuildId) -> anyhow::Result<SpawnedBuild> {
        let rx = {
            let mut inner = self.inner.lock().unwrap();
            if inner.fail_to_start {
                anyhow::bail!("fake launcher refused to start build {id}");
            }
            let (tx, rx) = oneshot::channel();
            inner.pending.insert(id, tx);
            inner.spans.push(BuildSpan {
                id,
                started: Instant::now(),
                stopped: None,
                terminated: false,
            });
            inner.live += 1;
            inner.max_live = inner.max_live.max(inner.live);
            rx
        };

        let exit_inner = Arc::clone(&self.inner);
        let exit = async move {
            let result = rx
                .await
                .unwrap_or_else(|_| BuildResult::failure("fake build dropped"));
            {
                let mut inner = exit_inner.lock().unwrap();
                inner.live -= 1;
                if let Some(span) = inner.spans.iter_mut().find(|s| s.id == id) {
                    span.stopped = Some(Instant::now());
                }
            }
            result
        };

        Ok(SpawnedBuild {
            tree: Arc::new(FakeTree {
                id,
                inner: Arc::clone(&self.inner),
            }),
            exit: Box::pin(exit),
        })
    }
}

struct FakeTree {
    id: BuildId,
    inner: Arc<Mutex<Inner>>,
}

impl ProcessTree for FakeTree {
    fn terminate(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(span) = inner.spans.iter_mut().find(|s| s.id == self.id) {
            span.terminated = true;
        }
        if inner.ignore_terminate {
            return;
        }
        if let Some(tx) = inner.pending.remove(&self.id) {
            let _ = tx.send(BuildResult::failure("compiling...\nTerminated"));
        }
    }
}
