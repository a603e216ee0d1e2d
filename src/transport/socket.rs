//! Socket primitive seam.
//!
//! A [`SocketFactory`] opens one [`Socket`] per connection attempt and
//! reports its lifecycle to a [`SocketHandler`]. All handler callbacks are
//! notifications: none of them may block.
//!
//! # Lifecycle
//!
//! ```text
//! open() ──► on_open ──► on_message* ──► on_close | on_error
//! ```
//!
//! After the owner calls [`Socket::close`], the socket may still deliver
//! callbacks that were already in flight. Owners must treat those as stale.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::error::Result;

// ============================================================================
// DisconnectReason
// ============================================================================

/// Why a socket stopped, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The peer closed the connection.
    Closed {
        /// WebSocket close code, if one was sent.
        code: Option<u16>,
        /// Close reason text (may be empty).
        reason: String,
    },
    /// The transport failed.
    Error {
        /// Description of the failure.
        message: String,
    },
}

impl DisconnectReason {
    /// Creates a close reason.
    #[inline]
    #[must_use]
    pub fn closed(code: Option<u16>, reason: impl Into<String>) -> Self {
        Self::Closed {
            code,
            reason: reason.into(),
        }
    }

    /// Creates an error reason.
    #[inline]
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Returns `true` if the socket ended because of a transport failure.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed {
                code: Some(code),
                reason,
            } => write!(f, "closed ({code}) {reason}"),
            Self::Closed { code: None, reason } => write!(f, "closed {reason}"),
            Self::Error { message } => write!(f, "error: {message}"),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Receives lifecycle notifications for one socket.
pub trait SocketHandler: Send + Sync {
    /// The socket is open and can send frames.
    fn on_open(&self);

    /// A text frame arrived.
    fn on_message(&self, text: &str);

    /// The peer closed the socket or the stream ended.
    fn on_close(&self, reason: Option<DisconnectReason>);

    /// The transport failed. No further callbacks follow.
    fn on_error(&self, reason: DisconnectReason);
}

/// A live bidirectional text socket.
pub trait Socket: Send + Sync {
    /// Queues a text frame for sending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`](crate::Error::ConnectionClosed)
    /// if the socket has already shut down.
    fn send_text(&self, text: String) -> Result<()>;

    /// Closes the socket. Idempotent.
    fn close(&self);
}

/// Opens sockets.
pub trait SocketFactory: Send + Sync {
    /// Starts opening a socket to `url`.
    ///
    /// Returns immediately; the outcome is reported through `handler`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the attempt cannot be started at all.
    fn open(&self, url: &Url, handler: Arc<dyn SocketHandler>) -> Result<Arc<dyn Socket>>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_display() {
        assert_eq!(
            DisconnectReason::closed(Some(1000), "bye").to_string(),
            "closed (1000) bye"
        );
        assert_eq!(
            DisconnectReason::error("reset").to_string(),
            "error: reset"
        );
    }

    #[test]
    fn test_reason_is_error() {
        assert!(DisconnectReason::error("x").is_error());
        assert!(!DisconnectReason::closed(None, "").is_error());
    }
}
