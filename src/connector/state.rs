//! Connection states and connector events.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use crate::protocol::Message;
use crate::transport::DisconnectReason;

// ============================================================================
// Event Names
// ============================================================================

/// Fired once the handshake is accepted.
///
/// A server command named `connected` is also fired under this name, with a
/// [`ConnectorEvent::Command`] payload. Match on the payload to tell them apart.
pub const EVENT_CONNECTED: &str = "connected";

/// Fired when the socket is torn down, for whatever reason.
///
/// Shares its name with a server `disconnect` command, like [`EVENT_CONNECTED`].
pub const EVENT_DISCONNECT: &str = "disconnect";

// ============================================================================
// ConnectionState
// ============================================================================

/// Protocol-level state of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// No socket.
    #[default]
    Disconnected,
    /// Socket opening or open, handshake reply not yet accepted.
    AwaitingHandshake,
    /// Handshake accepted; frames are dispatched as commands.
    Connected,
}

impl ConnectionState {
    /// Returns `true` if a socket is held in this state.
    #[inline]
    #[must_use]
    pub const fn has_socket(self) -> bool {
        !matches!(self, Self::Disconnected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::AwaitingHandshake => "awaiting-handshake",
            Self::Connected => "connected",
        };
        f.write_str(name)
    }
}

// ============================================================================
// ConnectorEvent
// ============================================================================

/// Payload passed to connector listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorEvent {
    /// Handshake accepted. Fired under [`EVENT_CONNECTED`].
    Connected,

    /// Socket torn down. Fired under [`EVENT_DISCONNECT`].
    Disconnected {
        /// Transport close/error value; `None` for a local disconnect.
        reason: Option<DisconnectReason>,
    },

    /// Server command. Fired under the command's own name.
    Command(Message),
}

impl ConnectorEvent {
    /// Returns the command message, if this is a command event.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Command(message) => Some(message),
            _ => None,
        }
    }

    /// Returns `true` for events raised by the connector itself rather than
    /// sent by the server.
    #[inline]
    #[must_use]
    pub const fn is_lifecycle(&self) -> bool {
        !matches!(self, Self::Command(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
