// File: pinflow-core/src/connect/mod.rs

pub mod poller;

pub use poller::{ConnectionPoller, PollerSettings};

use chrono::{DateTime, Utc};

/// Lifecycle of one connection attempt.
///
/// `Authenticated`, `TimedOut` and `Failed` are terminal for the attempt;
/// a fresh `connect()` resets to `Connecting`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectState {
    Idle,
    Connecting,
    Authenticated {
        authenticated_at: Option<DateTime<Utc>>,
    },
    TimedOut,
    Failed {
        message: String,
    },
}

impl ConnectState {
    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectState::Connecting)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConnectState::Authenticated { .. } | ConnectState::TimedOut | ConnectState::Failed { .. }
        )
    }
}
