// tests/cli_and_logging.rs

use clap::Parser;

use builderator::cli::{CliArgs, LogLevel};
use builderator::logging::resolve_filter;

#[test]
fn short_flags_parse() {
    let args = CliArgs::try_parse_from(["builderator", "-c", "conf/b.toml", "-o", "-n"])
        .expect("valid arguments");
    assert_eq!(args.config.as_deref(), Some("conf/b.toml"));
    assert!(args.once);
    assert!(args.dry_run);
    assert!(!args.generate);
    assert!(args.log_level.is_none());
}

#[test]
fn long_flags_parse() {
    let args = CliArgs::try_parse_from(["builderator", "--generate", "--log-level", "debug"])
        .expect("valid arguments");
    assert!(args.generate);
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
}

#[test]
fn unknown_log_level_is_rejected() {
    assert!(CliArgs::try_parse_from(["builderator", "--log-level", "loud"]).is_err());
}

#[test]
fn cli_level_beats_the_environment() {
    let filter = resolve_filter(Some(LogLevel::Warn), Some("trace".to_string()));
    assert_eq!(filter.to_string(), "warn");
}

#[test]
fn environment_filter_accepts_directives() {
    let filter = resolve_filter(None, Some(" builderator::exec=debug,info ".to_string()));
    let shown = filter.to_string();
    assert!(shown.contains("builderator::exec=debug"), "{shown}");
}

#[test]
fn missing_or_bad_environment_falls_back_to_info() {
    assert_eq!(resolve_filter(None, None).to_string(), "info");
    assert_eq!(resolve_filter(None, Some("  ".to_string())).to_string(), "info");
    assert_eq!(resolve_filter(None, Some("builderator=loudest".to_string())).to_string(), "info");
}
