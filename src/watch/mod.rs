// src/watch/mod.rs

//! Change detection.
//!
//! Wraps a recursive, debounced filesystem watcher and turns each debounced
//! batch into a single [`crate::engine::OrchestratorEvent::FilesChanged`].
//! It knows nothing about builds; paths the orchestrator writes itself are
//! filtered out so they cannot trigger a rebuild loop.

pub mod path_utils;
pub mod watcher;

pub use path_utils::{is_ignored, same_path};
pub use watcher::{spawn_change_source, ChangeSourceHandle, DEBOUNCE};
