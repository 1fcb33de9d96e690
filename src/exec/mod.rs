// src/exec/mod.rs

//! Build execution layer.
//!
//! - [`process`] spawns the build command in its own process group, buffers
//!   its output and knows how to terminate the whole group.
//! - [`standin`] performs the optional stand-in swap before a build.
//! - [`backend`] provides the [`BuildLauncher`] trait the orchestrator talks
//!   to, and the production [`CommandLauncher`]. Tests plug in an
//!   instrumented launcher instead.
//! - [`session`] wraps one launched build into a [`BuildSession`] that
//!   delivers exactly one result, whether the build finishes or is aborted.

pub mod backend;
pub mod process;
pub mod session;
pub mod standin;

pub use backend::{BuildLauncher, CommandLauncher};
pub use process::{
    shell_command, spawn_build, ExitFuture, ProcessGroup, ProcessTree, SpawnedBuild,
};
pub use session::BuildSession;
pub use standin::{staging_path, swap_in_stand_in};
