// src/types.rs

use std::fmt;

/// Identifier handed to each build session, used for log correlation.
pub type BuildId = u64;

/// Canonical output of a build that was canceled before it finished.
pub const CANCELED_OUTPUT: &str = "Build canceled";

/// Outcome of exactly one build session.
///
/// `success = false` covers a non-zero exit, a command that never started,
/// and a canceled build. Only the party that requested the cancellation
/// knows which of those it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub success: bool,
    pub output: String,
}

impl BuildResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }

    pub fn canceled() -> Self {
        Self::failure(CANCELED_OUTPUT)
    }

    pub fn failed_to_start(err: impl fmt::Display) -> Self {
        Self::failure(format!("Build failed to start: {err}"))
    }

    pub fn is_canceled(&self) -> bool {
        !self.success && self.output == CANCELED_OUTPUT
    }
}
