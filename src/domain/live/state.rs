//! Lifecycle of one live connection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `Connecting → PendingAuth → Authenticated → Closed`, or
/// `Connecting → PendingAuth → Closed` when authentication fails or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    PendingAuth,
    Authenticated,
    Closed,
}

impl SessionState {
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            (Connecting, PendingAuth)
                | (Connecting, Closed)
                | (PendingAuth, Authenticated)
                | (PendingAuth, Closed)
                | (Authenticated, Closed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Connecting => "connecting",
            SessionState::PendingAuth => "pending_auth",
            SessionState::Authenticated => "authenticated",
            SessionState::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}

/// What happens to a user's previous connection when they connect again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupersedePolicy {
    /// Replace the registry entry and leave the old connection to its transport.
    #[default]
    KeepOpen,
    /// Replace the registry entry and close the old connection.
    CloseSuperseded,
}
