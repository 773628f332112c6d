//! Connection lifecycle of the chat client
//!
//! Disconnected → Connecting → Authenticated → ShuttingDown → Closed.
//! Transitions only move forward; anything else is rejected.

use tracing::{info, warn};

/// The five states of the chat connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No transport yet
    #[default]
    Disconnected,
    /// Transport open, handshake not yet sent
    Connecting,
    /// Handshake sent, relaying votes
    Authenticated,
    /// Stop requested, flushing the leave sequence
    ShuttingDown,
    /// Leave sequence flushed, transport ready to be released
    Closed,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Authenticated => write!(f, "Authenticated"),
            ConnectionState::ShuttingDown => write!(f, "ShuttingDown"),
            ConnectionState::Closed => write!(f, "Closed"),
        }
    }
}

impl ConnectionState {
    /// The only state reachable from `self`
    fn successor(self) -> Option<ConnectionState> {
        match self {
            ConnectionState::Disconnected => Some(ConnectionState::Connecting),
            ConnectionState::Connecting => Some(ConnectionState::Authenticated),
            ConnectionState::Authenticated => Some(ConnectionState::ShuttingDown),
            ConnectionState::ShuttingDown => Some(ConnectionState::Closed),
            ConnectionState::Closed => None,
        }
    }

    /// Move to `next` if it directly follows the current state
    ///
    /// Returns false and leaves the state untouched otherwise.
    pub fn advance(&mut self, next: ConnectionState) -> bool {
        if self.successor() != Some(next) {
            warn!(from = %self, to = %next, "rejected connection state transition");
            return false;
        }

        info!(from = %self, to = %next, "connection state transition");
        *self = next;
        true
    }

    /// Whether chat lines may still be written
    pub fn can_send(self) -> bool {
        matches!(
            self,
            ConnectionState::Connecting
                | ConnectionState::Authenticated
                | ConnectionState::ShuttingDown
        )
    }
}
