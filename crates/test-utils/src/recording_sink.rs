use std::sync::{Arc, Mutex};

use builderator::report::{BuildStatus, StatusSink};
use builderator::types::BuildResult;

/// A sink that remembers every status it was handed.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    statuses: Arc<Mutex<Vec<BuildStatus>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> Vec<BuildStatus> {
        self.statuses.lock().unwrap().clone()
    }

    /// Only the reported results, in order.
    pub fn results(&self) -> Vec<BuildResult> {
        self.statuses
            .lock()
            .unwrap()
            .iter()
            .filter_map(|s| match s {
                BuildStatus::Finished(result) => Some(result.clone()),
                _ => None,
            })
            .collect()
    }
}

impl StatusSink for RecordingSink {
    fn publish(&self, status: &BuildStatus) {
        self.statuses.lock().unwrap().push(status.clone());
    }
}
