//! LiveReload endpoint and reload options.
//!
//! # Example
//!
//! ```ignore
//! use livereload_tab::LiveReloadOptions;
//!
//! let options = LiveReloadOptions::new()
//!     .with_port(35729)
//!     .with_path("/livereload");
//! ```

// ============================================================================
// Imports
// ============================================================================

use crate::error::{Error, Result};
use crate::protocol::{DEFAULT_PATH, DEFAULT_PORT};

// ============================================================================
// LiveReloadOptions
// ============================================================================

/// Where to find the LiveReload server and how to reload tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveReloadOptions {
    /// Server port.
    pub port: u16,

    /// Endpoint path, starting with `/`.
    pub path: String,

    /// Reload tabs bypassing the cache.
    pub bypass_cache: bool,
}

// ============================================================================
// Constructors
// ============================================================================

impl LiveReloadOptions {
    /// Creates options for the standard endpoint (`:35729/livereload`).
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for LiveReloadOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            bypass_cache: false,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl LiveReloadOptions {
    /// Sets the server port.
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the endpoint path.
    #[inline]
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Reloads bypassing the cache.
    #[inline]
    #[must_use]
    pub fn with_bypass_cache(mut self, bypass_cache: bool) -> Self {
        self.bypass_cache = bypass_cache;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl LiveReloadOptions {
    /// Checks the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the port is zero or the path does not
    /// start with `/`.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::config(
                "LiveReload port must be non-zero.\n\
                 Example: LiveReloadOptions::default().with_port(35729)",
            ));
        }

        if !self.path.starts_with('/') {
            return Err(Error::config(format!(
                "LiveReload path must start with '/', got '{}'.\n\
                 Example: LiveReloadOptions::default().with_path(\"/livereload\")",
                self.path
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
