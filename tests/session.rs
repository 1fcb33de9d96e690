// tests/session.rs

mod common;
use crate::common::{init_tracing, with_timeout, FakeLauncher, TestResult};

use std::time::Duration;

use tokio::time::timeout;

use builderator::exec::BuildSession;
use builderator::types::{BuildResult, CANCELED_OUTPUT};

/// Assert the session has nothing more to give: a further receive either
/// reports the channel closed or would block.
async fn assert_no_second_result(session: &mut BuildSession) {
    match timeout(Duration::from_millis(50), session.recv_result()).await {
        Ok(Some(extra)) => panic!("second result delivered: {extra:?}"),
        Ok(None) | Err(_) => {}
    }
}

#[tokio::test]
async fn natural_completion_delivers_the_build_result() -> TestResult {
    init_tracing();
    let launcher = FakeLauncher::new();
    let mut session = BuildSession::start(&launcher, 7);
    assert_eq!(launcher.started(), vec![7]);

    launcher.complete(7, BuildResult::success("linked"));
    let result = with_timeout(session.recv_result()).await;
    assert_eq!(result, Some(BuildResult::success("linked")));

    assert_no_second_result(&mut session).await;
    with_timeout(session.retire()).await;
    assert!(launcher.terminated().is_empty());
    Ok(())
}

#[tokio::test]
async fn abort_yields_canceled_even_with_partial_output() -> TestResult {
    init_tracing();
    let launcher = FakeLauncher::new();
    let mut session = BuildSession::start(&launcher, 1);

    session.abort();
    assert!(session.abort_requested());

    let result = with_timeout(session.recv_result()).await.expect("a result");
    assert!(!result.success);
    assert_eq!(result.output, CANCELED_OUTPUT);
    assert!(result.is_canceled());

    assert_eq!(launcher.terminated(), vec![1]);
    assert_eq!(launcher.live(), 0);
    with_timeout(session.retire()).await;
    Ok(())
}

#[tokio::test]
async fn canceled_result_waits_for_the_process_to_exit() -> TestResult {
    init_tracing();
    let launcher = FakeLauncher::new();
    launcher.ignore_terminate(true);
    let mut session = BuildSession::start(&launcher, 1);

    session.abort();
    let early = timeout(Duration::from_millis(100), session.recv_result()).await;
    assert!(early.is_err(), "result delivered before the process exited");
    assert_eq!(launcher.live(), 1);

    launcher.complete(1, BuildResult::failure("Terminated"));
    let result = with_timeout(session.recv_result()).await;
    assert_eq!(result, Some(BuildResult::canceled()));
    assert_eq!(launcher.live(), 0);
    with_timeout(session.retire()).await;
    Ok(())
}

#[tokio::test]
async fn abort_twice_is_the_same_as_once() -> TestResult {
    init_tracing();
    let launcher = FakeLauncher::new();
    let mut session = BuildSession::start(&launcher, 1);

    session.abort();
    session.abort();

    let result = with_timeout(session.recv_result()).await;
    assert_eq!(result, Some(BuildResult::canceled()));
    assert_no_second_result(&mut session).await;

    // Aborting a finished session is harmless too.
    session.abort();
    assert_no_second_result(&mut session).await;
    with_timeout(session.retire()).await;
    Ok(())
}

#[tokio::test]
async fn abort_after_completion_keeps_the_natural_result() -> TestResult {
    init_tracing();
    let launcher = FakeLauncher::new();
    let mut session = BuildSession::start(&launcher, 1);

    launcher.complete(1, BuildResult::success("fast"));
    let result = with_timeout(session.recv_result()).await;
    assert_eq!(result, Some(BuildResult::success("fast")));

    session.abort();
    assert_no_second_result(&mut session).await;
    with_timeout(session.retire()).await;
    Ok(())
}

#[tokio::test]
async fn launch_failure_still_delivers_exactly_one_result() -> TestResult {
    init_tracing();
    let launcher = FakeLauncher::new();
    launcher.fail_to_start(true);
    let mut session = BuildSession::start(&launcher, 3);

    // Aborting a session whose process never started must not block.
    session.abort();

    let result = with_timeout(session.recv_result()).await.expect("a result");
    assert!(!result.success);
    assert!(result.output.starts_with("Build failed to start"));
    assert!(result.output.contains("build 3"));

    assert_eq!(with_timeout(session.recv_result()).await, None);
    with_timeout(session.retire()).await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_exit_and_abort_deliver_exactly_one_result() -> TestResult {
    init_tracing();
    let launcher = FakeLauncher::new();

    for id in 1..=200 {
        let mut session = BuildSession::start(&launcher, id);

        // Natural exit and abort at the same instant.
        let racer = launcher.clone();
        let exiting = tokio::spawn(async move {
            racer.complete(id, BuildResult::success("raced"));
        });
        session.abort();
        exiting.await?;

        let result = with_timeout(session.recv_result()).await.expect("a result");
        assert!(
            result == BuildResult::success("raced") || result.is_canceled(),
            "unexpected result {result:?}"
        );
        assert_no_second_result(&mut session).await;
        with_timeout(session.retire()).await;
    }

    assert_eq!(launcher.live(), 0);
    launcher.assert_no_overlap();
    Ok(())
}
