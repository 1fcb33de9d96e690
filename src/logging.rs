// src/logging.rs

//! Logging setup for `builderator` using `tracing` + `tracing-subscriber`.
//!
//! Where the filter comes from, first match wins:
//! 1. `--log-level` on the command line
//! 2. `BUILDERATOR_LOG`, in `EnvFilter` syntax (`debug`,
//!    `builderator::exec=trace,info`, ...)
//! 3. `info`
//!
//! Everything goes to stderr; stdout is reserved for `--dry-run` output.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "BUILDERATOR_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(resolve_filter(cli_level, std::env::var(LOG_ENV_VAR).ok()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

/// Pick the filter from the CLI level or the env value.
///
/// An env value that does not parse is reported on stderr and ignored.
pub fn resolve_filter(cli_level: Option<LogLevel>, env_value: Option<String>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_directive());
    }
    match env_value.filter(|v| !v.trim().is_empty()) {
        Some(value) => EnvFilter::try_new(value.trim()).unwrap_or_else(|e| {
            eprintln!("ignoring {LOG_ENV_VAR}={value:?}: {e}");
            EnvFilter::new(DEFAULT_DIRECTIVE)
        }),
        None => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
