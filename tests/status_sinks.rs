// tests/status_sinks.rs

mod common;
use crate::common::{init_tracing, with_timeout, ConfigBuilder, TestResult};

use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::UdpSocket;

use builderator::fs::mock::MockFileSystem;
use builderator::fs::FileSystem;
use builderator::report::{
    send_indicator, BuildStatus, IndicatorSink, IndicatorStyle, StatusFileSink, StatusReporter,
    StatusSink,
};
use builderator::types::BuildResult;

#[test]
fn status_text_for_every_state() {
    assert_eq!(BuildStatus::Building.status_text(), "BUILDING");
    assert_eq!(BuildStatus::Canceling.status_text(), "CANCELING");
    assert_eq!(
        BuildStatus::Finished(BuildResult::success("linked app\n")).status_text(),
        "ok\n\nlinked app\n"
    );
    assert_eq!(
        BuildStatus::Finished(BuildResult::failure("error[E0308]")).status_text(),
        "FAILED\n\nerror[E0308]"
    );
    assert_eq!(
        BuildStatus::Finished(BuildResult::canceled()).status_text(),
        "FAILED\n\nBuild canceled"
    );
}

#[test]
fn indicator_style_for_every_state() {
    assert_eq!(BuildStatus::Building.indicator_style(), IndicatorStyle::Blue);
    assert_eq!(BuildStatus::Canceling.indicator_style(), IndicatorStyle::Orange);
    assert_eq!(
        BuildStatus::Finished(BuildResult::success("")).indicator_style(),
        IndicatorStyle::Black
    );
    assert_eq!(
        BuildStatus::Finished(BuildResult::canceled()).indicator_style(),
        IndicatorStyle::Red
    );
    assert_eq!(IndicatorStyle::Orange.as_str(), "orange");
}

#[test]
fn status_file_sink_overwrites_with_the_latest_status() {
    init_tracing();
    let mock = MockFileSystem::new();
    let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());
    let sink = StatusFileSink::new("/tmp/status".into(), fs);

    sink.publish(&BuildStatus::Building);
    assert_eq!(mock.contents("/tmp/status").as_deref(), Some("BUILDING"));

    sink.publish(&BuildStatus::Finished(BuildResult::success("done")));
    assert_eq!(mock.contents("/tmp/status").as_deref(), Some("ok\n\ndone"));
}

#[test]
fn unwritable_status_file_is_not_fatal() {
    init_tracing();
    let mock = MockFileSystem::new();
    mock.fail_writes(true);
    let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());
    let sink = StatusFileSink::new("/tmp/status".into(), fs);

    sink.publish(&BuildStatus::Building);
    assert_eq!(mock.contents("/tmp/status"), None);

    mock.fail_writes(false);
    sink.publish(&BuildStatus::Canceling);
    assert_eq!(mock.contents("/tmp/status").as_deref(), Some("CANCELING"));
}

#[tokio::test]
async fn reporter_from_config_writes_the_configured_status_file() -> TestResult {
    init_tracing();
    let mock = MockFileSystem::new();
    let config = ConfigBuilder::new(Path::new("/w"))
        .status_file("/w/status")
        .build();

    let reporter = StatusReporter::from_config(&config, Arc::new(mock.clone()));
    reporter.publish(&BuildStatus::Finished(BuildResult::failure("nope")));
    assert_eq!(mock.contents("/w/status").as_deref(), Some("FAILED\n\nnope"));
    Ok(())
}

#[tokio::test]
async fn indicator_sends_the_style_name_as_a_datagram() -> TestResult {
    init_tracing();
    let listener = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let port = listener.local_addr()?.port();

    send_indicator(port, IndicatorStyle::Blue, Duration::from_secs(1)).await?;

    let mut buf = [0u8; 32];
    let n = with_timeout(listener.recv(&mut buf)).await?;
    assert_eq!(&buf[..n], b"blue");
    Ok(())
}

#[tokio::test]
async fn indicator_sink_publishes_in_the_background() -> TestResult {
    init_tracing();
    let listener = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let port = listener.local_addr()?.port();
    let sink = IndicatorSink::new(port).with_deadline(Duration::from_millis(500));

    sink.publish(&BuildStatus::Canceling);
    sink.publish(&BuildStatus::Finished(BuildResult::success("")));

    // Each update is its own task, so arrival order is not guaranteed.
    let mut seen = Vec::new();
    for _ in 0..2 {
        let mut buf = [0u8; 32];
        let n = with_timeout(listener.recv(&mut buf)).await?;
        seen.push(String::from_utf8_lossy(&buf[..n]).into_owned());
    }
    seen.sort();
    assert_eq!(seen, vec!["black".to_string(), "orange".to_string()]);
    Ok(())
}

#[tokio::test]
async fn indicator_without_a_listener_does_not_hang() -> TestResult {
    init_tracing();
    // Grab a free port, then release it so nothing is listening there.
    let port = {
        let probe = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        probe.local_addr()?.port()
    };

    let started = Instant::now();
    // UDP is fire-and-forget: either the send succeeds or fails fast.
    let _ = send_indicator(port, IndicatorStyle::Red, Duration::from_millis(200)).await;
    assert!(started.elapsed() < Duration::from_secs(1));

    IndicatorSink::new(port).publish(&BuildStatus::Building);
    Ok(())
}
