//! Builder pattern for tab manager configuration.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use livereload_tab::{Indicator, ReloadOptions, TabHost, TabId, TabManager};
//!
//! struct Toolbar;
//!
//! impl TabHost for Toolbar {
//!     fn set_indicator(&self, tab_id: TabId, indicator: &Indicator) {
//!         println!("{tab_id}: {}", indicator.title);
//!     }
//!     fn reload(&self, tab_id: TabId, _options: ReloadOptions) {
//!         println!("{tab_id}: reload");
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> livereload_tab::Result<()> {
//! let manager = TabManager::builder()
//!     .host(Arc::new(Toolbar))
//!     .port(35729)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::transport::{SocketFactory, WsSocketFactory};

use super::core::TabManager;
use super::host::TabHost;
use super::options::LiveReloadOptions;

// ============================================================================
// TabManagerBuilder
// ============================================================================

/// Builder for configuring a [`TabManager`].
///
/// Use [`TabManager::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct TabManagerBuilder {
    /// Tab surface.
    host: Option<Arc<dyn TabHost>>,
    /// Socket opener.
    factory: Option<Arc<dyn SocketFactory>>,
    /// Endpoint and reload options.
    options: LiveReloadOptions,
}

impl fmt::Debug for TabManagerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabManagerBuilder")
            .field("host", &self.host.is_some())
            .field("factory", &self.factory.is_some())
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// TabManagerBuilder Implementation
// ============================================================================

impl TabManagerBuilder {
    /// Creates a builder with default options and no host.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tab surface.
    #[inline]
    #[must_use]
    pub fn host(mut self, host: Arc<dyn TabHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the socket opener.
    ///
    /// Defaults to a [`WsSocketFactory`] on the current tokio runtime.
    #[inline]
    #[must_use]
    pub fn socket_factory(mut self, factory: Arc<dyn SocketFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Replaces all options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: LiveReloadOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the server port.
    #[inline]
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.options.port = port;
        self
    }

    /// Sets the endpoint path.
    #[inline]
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.options.path = path.into();
        self
    }

    /// Reloads tabs bypassing the cache.
    #[inline]
    #[must_use]
    pub fn bypass_cache(mut self, bypass_cache: bool) -> Self {
        self.options.bypass_cache = bypass_cache;
        self
    }

    /// Builds the manager with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no host is set
    /// - [`Error::Config`] if the options are invalid
    /// - [`Error::Config`] if no socket factory is set and there is no tokio
    ///   runtime to create the default one on
    pub fn build(self) -> Result<TabManager> {
        let host = self.validate_host()?;
        self.options.validate()?;

        let factory = match self.factory {
            Some(factory) => factory,
            None => Arc::new(WsSocketFactory::new()?),
        };

        Ok(TabManager::new(host, factory, self.options))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl TabManagerBuilder {
    /// Validates the host configuration.
    fn validate_host(&self) -> Result<Arc<dyn TabHost>> {
        self.host.clone().ok_or_else(|| {
            Error::config(
                "A tab host is required. Use .host() to set it.\n\
                 Example: TabManager::builder().host(Arc::new(MyHost))",
            )
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio_test::{assert_err, assert_ok};

    use crate::identifiers::TabId;
    use crate::manager::host::{Indicator, ReloadOptions};
    use crate::transport::mock::MockSocketFactory;

    struct NullHost;

    impl TabHost for NullHost {
        fn set_indicator(&self, _tab_id: TabId, _indicator: &Indicator) {}
        fn reload(&self, _tab_id: TabId, _options: ReloadOptions) {}
    }

    fn factory() -> Arc<dyn SocketFactory> {
        MockSocketFactory::new()
    }

    #[test]
    fn test_new_creates_default_builder() {
        let builder = TabManagerBuilder::new();
        assert!(builder.host.is_none());
        assert!(builder.factory.is_none());
        assert_eq!(builder.options, LiveReloadOptions::default());
    }

    #[test]
    fn test_build_fails_without_host() {
        let err = assert_err!(TabManagerBuilder::new().socket_factory(factory()).build());
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn test_build_fails_with_bad_path() {
        let result = TabManagerBuilder::new()
            .host(Arc::new(NullHost))
            .socket_factory(factory())
            .path("livereload")
            .build();
        assert_err!(result);
    }

    #[test]
    fn test_build_fails_with_zero_port() {
        let result = TabManagerBuilder::new()
            .host(Arc::new(NullHost))
            .socket_factory(factory())
            .port(0)
            .build();
        assert_err!(result);
    }

    #[test]
    fn test_build_without_factory_needs_runtime() {
        let err = assert_err!(TabManagerBuilder::new().host(Arc::new(NullHost)).build());
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_build_default_factory_in_runtime() {
        let manager = assert_ok!(TabManagerBuilder::new().host(Arc::new(NullHost)).build());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_build_applies_options() {
        let manager = assert_ok!(
            TabManagerBuilder::new()
                .host(Arc::new(NullHost))
                .socket_factory(factory())
                .port(4000)
                .path("/lr")
                .bypass_cache(true)
                .build()
        );
        assert_eq!(manager.options().port, 4000);
        assert_eq!(manager.options().path, "/lr");
        assert!(manager.options().bypass_cache);
    }

    #[test]
    fn test_builder_is_clone() {
        let builder = TabManagerBuilder::new().port(1234);
        let cloned = builder.clone();
        assert_eq!(builder.options, cloned.options);
    }
}
