//! Socket transport layer.
//!
//! The connector never talks to the network directly. It opens sockets
//! through a [`SocketFactory`] and reacts to [`SocketHandler`] callbacks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Connector      │                              │  LiveReload     │
//! │                 │         WebSocket            │  server         │
//! │  SocketFactory  │─────────────────────────────►│                 │
//! │  → Socket       │     <host>:35729/livereload  │                 │
//! │  ← SocketHandler│◄─────────────────────────────│                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `socket` | Socket traits and [`DisconnectReason`] |
//! | `websocket` | `tokio-tungstenite` implementation |

// ============================================================================
// Submodules
// ============================================================================

/// Socket traits.
pub mod socket;

/// WebSocket client implementation.
pub mod websocket;

#[cfg(test)]
pub(crate) mod mock;

// ============================================================================
// Re-exports
// ============================================================================

pub use socket::{DisconnectReason, Socket, SocketFactory, SocketHandler};
pub use websocket::WsSocketFactory;
