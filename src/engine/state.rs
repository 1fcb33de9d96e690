// src/engine/state.rs

//! Build lifecycle state machine.
//!
//! ```text
//!            start                 change
//!   IDLE ───────────▶ BUILDING ───────────▶ CANCELING
//!    ▲                  │                      │
//!    └──── result ──────┘◀── drained result ───┘
//!                           (report, restart)
//! ```
//!
//! The live session lives *inside* the state, so "at most one live session"
//! holds by construction: there is no slot for a second one.

use crate::exec::BuildSession;

/// The orchestrator's current build, if any.
#[derive(Debug, Default)]
pub enum BuildState {
    /// No session. Only seen before the first build and after a natural
    /// completion, while waiting for the next change.
    #[default]
    Idle,
    /// A session is running and nobody has asked it to stop.
    Building(BuildSession),
    /// Abort has been requested; waiting for the session's terminal result.
    Canceling(BuildSession),
}

impl BuildState {
    /// BUILDING → CANCELING, requesting abort on the session.
    ///
    /// Returns `false` (and changes nothing) in any other state.
    pub fn begin_cancel(&mut self) -> bool {
        match std::mem::take(self) {
            BuildState::Building(mut session) => {
                session.abort();
                *self = BuildState::Canceling(session);
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Leave the current state for IDLE, handing back the session.
    pub fn take_session(&mut self) -> Option<BuildSession> {
        match std::mem::take(self) {
            BuildState::Building(session) | BuildState::Canceling(session) => Some(session),
            BuildState::Idle => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut BuildSession> {
        match self {
            BuildState::Building(session) | BuildState::Canceling(session) => Some(session),
            BuildState::Idle => None,
        }
    }
}
