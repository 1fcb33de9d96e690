// tests/platform_shell.rs

mod common;
use crate::common::{init_tracing, with_timeout, ConfigBuilder, TestResult};

use std::ffi::OsStr;
use std::sync::Arc;

use builderator::exec::{shell_command, BuildSession, CommandLauncher};
use builderator::fs::{FileSystem, RealFileSystem};

#[test]
fn build_command_goes_through_the_platform_shell() {
    let cmd = shell_command("make all");
    let std_cmd = cmd.as_std();
    let args: Vec<&OsStr> = std_cmd.get_args().collect();

    if cfg!(windows) {
        assert_eq!(std_cmd.get_program(), "cmd");
        assert_eq!(args, ["/C", "make all"]);
    } else {
        assert_eq!(std_cmd.get_program(), "sh");
        assert_eq!(args, ["-c", "make all"]);
    }
}

#[tokio::test]
async fn cancel_stops_a_long_running_build() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let long_running = if cfg!(windows) {
        "ping -n 30 127.0.0.1"
    } else {
        "sleep 30"
    };
    let config = ConfigBuilder::new(dir.path()).build_cmd(long_running).build();
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let launcher = CommandLauncher::new(Arc::new(config), fs);

    let mut session = BuildSession::start(&launcher, 1);
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    session.abort();

    // Without a real tree kill this would wait out the whole command.
    let result = with_timeout(session.recv_result()).await.expect("a result");
    assert!(result.is_canceled(), "got {result:?}");
    with_timeout(session.retire()).await;
    Ok(())
}
