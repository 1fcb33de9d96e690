// src/engine/mod.rs

//! Orchestration engine for builderator.
//!
//! The orchestrator is a single event loop that reacts to:
//! - change events from the watcher
//! - the result of the current build session
//! - shutdown requests
//!
//! [`state`] holds the explicit build state machine; [`orchestrator`] is the
//! async loop driving it.

/// Events flowing into the orchestrator from the watcher, signal handlers,
/// etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorEvent {
    /// Something under the watch directory changed (one debounced batch).
    FilesChanged,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Options for the orchestrator loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrchestratorOptions {
    /// Stop after the first reported result, natural or canceled
    /// (`--once`).
    pub single_run: bool,
}

pub mod orchestrator;
pub mod state;

pub use orchestrator::Orchestrator;
pub use state::BuildState;
