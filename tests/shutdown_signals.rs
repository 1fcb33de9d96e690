// tests/shutdown_signals.rs
//
// Raises real signals at the test process, so it lives in its own binary.
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout, TestResult};

use nix::sys::signal::{raise, Signal};
use tokio::sync::mpsc;

use builderator::engine::OrchestratorEvent;
use builderator::forward_shutdown_signals;

async fn raise_and_expect_shutdown(signal: Signal) -> TestResult {
    let (tx, mut rx) = mpsc::channel(1);
    let listener = forward_shutdown_signals(tx)?;

    raise(signal)?;

    assert_eq!(
        with_timeout(rx.recv()).await,
        Some(OrchestratorEvent::ShutdownRequested)
    );
    with_timeout(listener).await?;
    Ok(())
}

#[tokio::test]
async fn sigterm_and_sighup_request_a_graceful_shutdown() -> TestResult {
    init_tracing();
    raise_and_expect_shutdown(Signal::SIGTERM).await?;
    raise_and_expect_shutdown(Signal::SIGHUP).await?;
    Ok(())
}
