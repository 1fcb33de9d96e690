// src/report/status_file.rs

use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::fs::FileSystem;
use crate::report::{BuildStatus, StatusSink};

/// Overwrites a file with the current [`BuildStatus::status_text`].
#[derive(Debug, Clone)]
pub struct StatusFileSink {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl StatusFileSink {
    pub fn new(path: PathBuf, fs: Arc<dyn FileSystem>) -> Self {
        Self { path, fs }
    }
}

impl StatusSink for StatusFileSink {
    fn publish(&self, status: &BuildStatus) {
        let text = status.status_text();
        if let Err(e) = self.fs.write(&self.path, text.as_bytes()) {
            warn!(
                path = %self.path.display(),
                error = %format!("{e:#}"),
                "could not write status file"
            );
        }
    }
}
