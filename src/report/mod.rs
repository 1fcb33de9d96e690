// src/report/mod.rs

//! Build status reporting.
//!
//! The orchestrator publishes a [`BuildStatus`] at every transition. Each
//! configured [`StatusSink`] turns it into a side effect: the status file
//! ([`status_file`]) and the UDP status indicator ([`indicator`]). Sinks are
//! best effort; a failing sink logs and carries on.

pub mod indicator;
pub mod status_file;

use std::sync::Arc;

use crate::config::Config;
use crate::fs::FileSystem;
use crate::types::BuildResult;

pub use indicator::{send_indicator, IndicatorSink, IndicatorStyle, INDICATOR_DEADLINE};
pub use status_file::StatusFileSink;

/// Externally visible build state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    Building,
    Canceling,
    Finished(BuildResult),
}

impl BuildStatus {
    /// Text written to the status file.
    pub fn status_text(&self) -> String {
        match self {
            BuildStatus::Building => "BUILDING".to_string(),
            BuildStatus::Canceling => "CANCELING".to_string(),
            BuildStatus::Finished(result) if result.success => format!("ok\n\n{}", result.output),
            BuildStatus::Finished(result) => format!("FAILED\n\n{}", result.output),
        }
    }

    pub fn indicator_style(&self) -> IndicatorStyle {
        match self {
            BuildStatus::Building => IndicatorStyle::Blue,
            BuildStatus::Canceling => IndicatorStyle::Orange,
            BuildStatus::Finished(result) if result.success => IndicatorStyle::Black,
            BuildStatus::Finished(_) => IndicatorStyle::Red,
        }
    }
}

/// A destination for status updates.
///
/// Implementations must not block the caller on slow I/O and must swallow
/// their own failures.
pub trait StatusSink: Send + Sync {
    fn publish(&self, status: &BuildStatus);
}

/// Fans each status update out to every configured sink.
#[derive(Default, Clone)]
pub struct StatusReporter {
    sinks: Vec<Arc<dyn StatusSink>>,
}

impl std::fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReporter")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl StatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sinks for whatever `config` enables: status file and/or indicator.
    pub fn from_config(config: &Config, fs: Arc<dyn FileSystem>) -> Self {
        let mut reporter = Self::new();
        if let Some(path) = &config.status_file {
            reporter = reporter.with_sink(Arc::new(StatusFileSink::new(path.clone(), fs)));
        }
        if let Some(port) = config.status_bar_port {
            reporter = reporter.with_sink(Arc::new(IndicatorSink::new(port)));
        }
        reporter
    }

    pub fn with_sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn publish(&self, status: &BuildStatus) {
        for sink in &self.sinks {
            sink.publish(status);
        }
    }
}
