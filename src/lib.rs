//! LiveReload tab client.
//!
//! Keeps a LiveReload connection per browser tab and reloads the tab when
//! the development server reports a change.
//!
//! # Architecture
//!
//! ```text
//! activation ──► TabManager ──► Connector ──► Socket ──► LiveReload server
//!                    ▲              │
//!                    └── events ────┘  connected / disconnect / reload
//!                    │
//!                    ▼
//!                 TabHost (indicator, reload)
//! ```
//!
//! - **TabManager**: one [`Connector`] per tab, created from the tab URL
//! - **Connector**: `hello` handshake, then dispatches server commands as events
//! - **TabHost**: the embedder's tab surface (icons, titles, reload)
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use livereload_tab::{Indicator, ReloadOptions, Result, TabHost, TabId, TabInfo, TabManager};
//!
//! struct Host;
//!
//! impl TabHost for Host {
//!     fn set_indicator(&self, tab_id: TabId, indicator: &Indicator) {
//!         println!("tab {tab_id}: {}", indicator.title);
//!     }
//!     fn reload(&self, tab_id: TabId, _options: ReloadOptions) {
//!         println!("tab {tab_id}: reload");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let manager = TabManager::builder().host(Arc::new(Host)).build()?;
//!
//!     // Toolbar click on tab 1
//!     manager.activate(Some(TabInfo::new(1, "http://localhost:8080/")));
//!
//!     tokio::signal::ctrl_c().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`connector`] | Event emitter and connection state machine |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`manager`] | Tab registry, host seam and options |
//! | [`protocol`] | Wire messages and target address derivation |
//! | [`transport`] | Socket seam and WebSocket implementation |

// ============================================================================
// Modules
// ============================================================================

/// Event emitter and per-tab connection state machine.
pub mod connector;

/// Error types and result aliases.
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Tab registry, host seam and options.
pub mod manager;

/// LiveReload wire protocol.
pub mod protocol;

/// Socket seam and WebSocket client.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Connector types
pub use connector::{
    ConnectionState, Connector, ConnectorEvent, EventEmitter, EventHold, Listener, listener,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::TabId;

// Manager types
pub use manager::{
    Indicator, IndicatorState, LiveReloadOptions, ReloadOptions, TabHost, TabInfo, TabManager,
    TabManagerBuilder,
};

// Protocol types
pub use protocol::{Message, PROTOCOL_OFFICIAL_7, ReloadCommand, target_address};

// Transport types
pub use transport::{DisconnectReason, Socket, SocketFactory, SocketHandler, WsSocketFactory};
