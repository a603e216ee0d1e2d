//! Tab manager: the per-tab connector registry.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TabManager`] | Maps tabs to connectors and reflects their state |
//! | [`TabManagerBuilder`] | Fluent configuration builder |
//! | [`LiveReloadOptions`] | Endpoint and reload options |
//! | [`TabHost`] | Tab actions provided by the embedder |
//!
//! # Example
//!
//! ```ignore
//! let manager = TabManager::builder()
//!     .host(Arc::new(MyHost))
//!     .build()?;
//!
//! manager.activate(None);
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for the tab manager.
pub mod builder;

/// Tab manager implementation.
pub mod core;

/// Host seam.
pub mod host;

/// Endpoint and reload options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::TabManager;
pub use builder::TabManagerBuilder;
pub use host::{Indicator, IndicatorState, ReloadOptions, TabHost, TabInfo};
pub use options::LiveReloadOptions;
