//! Per-tab LiveReload connection.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`EventEmitter`] | Named event channels |
//! | [`Connector`] | Handshake and dispatch state machine over one socket |
//! | [`ConnectionState`] | `Disconnected`, `AwaitingHandshake`, `Connected` |
//! | [`ConnectorEvent`] | Payload passed to connector listeners |
//!
//! # Example
//!
//! ```ignore
//! use livereload_tab::connector::{Connector, ConnectorEvent, listener};
//!
//! let connector = Connector::new(target, factory);
//! connector.on("reload", listener(|event: &ConnectorEvent| {
//!     println!("reload: {:?}", event.message());
//! }));
//! connector.toggle();
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Connector state machine.
pub mod core;

/// Event emitter.
pub mod emitter;

/// States and event payloads.
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::{Connector, EventHold};
pub use emitter::{EventEmitter, Listener, listener};
pub use state::{ConnectionState, ConnectorEvent, EVENT_CONNECTED, EVENT_DISCONNECT};
