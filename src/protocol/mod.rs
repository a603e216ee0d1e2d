//! LiveReload wire protocol.
//!
//! Frames are compact JSON objects carried as WebSocket text messages.
//!
//! # Protocol Overview
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | [`Hello`] | Client → Server | Handshake request |
//! | `hello` reply | Server → Client | Handshake acceptance |
//! | [`Message`] | Server → Client | Command (`reload`, `alert`, ...) |
//!
//! # Target Address
//!
//! The server address is derived from the tab URL by [`target_address`]:
//! the host is kept, everything else is replaced by
//! `ws://<host>:35729/livereload`.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `address` | Tab URL → WebSocket target |
//! | `message` | Handshake and command messages |

// ============================================================================
// Submodules
// ============================================================================

/// Target address derivation.
pub mod address;

/// Handshake and command message types.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use address::{DEFAULT_PATH, DEFAULT_PORT, extract_host, target_address};
pub use message::{
    COMMAND_HELLO, COMMAND_RELOAD, Hello, Message, PROTOCOL_OFFICIAL_7, ReloadCommand,
};
