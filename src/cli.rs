// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `builderator`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "builderator",
    version,
    about = "Rebuild whenever files change, with at most one build in flight.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: the nearest `.builderator.toml` in the current directory or
    /// one of its ancestors.
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<String>,

    /// Report the first build result (natural or canceled) and exit.
    #[arg(short = 'o', long)]
    pub once: bool,

    /// Print the resolved config and exit without building.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Write a starter `.builderator.toml` into the current directory.
    #[arg(short = 'g', long)]
    pub generate: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUILDERATOR_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
