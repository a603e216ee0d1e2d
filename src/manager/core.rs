//! Per-tab connector registry.
//!
//! Maps each tab to at most one [`Connector`] and mirrors connector events
//! onto the tab's indicator.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              TabManager                 │
//! │  ┌─────────────────────────────────┐    │
//! │  │ TabId=1 → Connector (ws://a…)   │    │
//! │  │ TabId=7 → Connector (ws://b…)   │    │
//! │  └─────────────────────────────────┘    │
//! │        │ connected / disconnect / reload│
//! │        ▼                                │
//! │     TabHost (indicator, reload)         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Entry Lifecycle
//!
//! An entry is created by the first [`TabManager::toggle`] for a tab and
//! removed only by [`TabManager::tab_removed`]. A dropped connection keeps
//! its entry, so the next toggle reopens the same connector.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::connector::{
    ConnectionState, ConnectorEvent, Connector, EVENT_CONNECTED, EVENT_DISCONNECT, listener,
};
use crate::identifiers::TabId;
use crate::protocol::{COMMAND_RELOAD, target_address};
use crate::transport::SocketFactory;

use super::builder::TabManagerBuilder;
use super::host::{Indicator, ReloadOptions, TabHost, TabInfo};
use super::options::LiveReloadOptions;

// ============================================================================
// TabManager
// ============================================================================

/// Owns one connector per tab.
///
/// Thread-safe: the map is behind a lock that is never held while a
/// connector or the host is called.
///
/// # Example
///
/// ```ignore
/// let manager = TabManager::builder().host(host).build()?;
///
/// // Toolbar click
/// manager.activate(Some(TabInfo::new(1, "http://localhost:8080/")));
///
/// // Host tab events
/// manager.tab_loaded(TabId::new(1), None);
/// manager.tab_removed(TabId::new(1));
/// ```
pub struct TabManager {
    /// Tab surface.
    host: Arc<dyn TabHost>,

    /// Socket opener handed to every connector.
    factory: Arc<dyn SocketFactory>,

    /// Endpoint and reload options.
    options: LiveReloadOptions,

    /// Connectors by tab.
    connectors: RwLock<FxHashMap<TabId, Connector>>,
}

impl fmt::Debug for TabManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabManager")
            .field("options", &self.options)
            .field("tabs", &self.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TabManager - Constructor
// ============================================================================

impl TabManager {
    /// Creates a builder.
    #[inline]
    #[must_use]
    pub fn builder() -> TabManagerBuilder {
        TabManagerBuilder::new()
    }

    /// Creates a manager from validated parts.
    pub(crate) fn new(
        host: Arc<dyn TabHost>,
        factory: Arc<dyn SocketFactory>,
        options: LiveReloadOptions,
    ) -> Self {
        Self {
            host,
            factory,
            options,
            connectors: RwLock::new(FxHashMap::default()),
        }
    }
}

// ============================================================================
// TabManager - Accessors
// ============================================================================

impl TabManager {
    /// Returns the options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &LiveReloadOptions {
        &self.options
    }

    /// Returns the connector registered for a tab.
    #[inline]
    #[must_use]
    pub fn connector(&self, tab_id: TabId) -> Option<Connector> {
        self.connectors.read().get(&tab_id).cloned()
    }

    /// Returns the number of registered tabs.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.connectors.read().len()
    }

    /// Returns `true` if no tab is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connectors.read().is_empty()
    }

    /// Returns the registered tab IDs, sorted.
    #[must_use]
    pub fn tab_ids(&self) -> Vec<TabId> {
        let mut ids: Vec<TabId> = self.connectors.read().keys().copied().collect();
        ids.sort();
        ids
    }
}

// ============================================================================
// TabManager - Host Events
// ============================================================================

impl TabManager {
    /// Handles a user activation.
    ///
    /// Without a tab, the host's active tab is used. Returns the toggled
    /// connector, or `None` if there was nothing to toggle.
    pub fn activate(&self, tab: Option<TabInfo>) -> Option<Connector> {
        let Some(tab) = tab.or_else(|| self.host.active_tab()) else {
            debug!("Activation without an active tab");
            return None;
        };
        self.toggle(&tab)
    }

    /// Connects or disconnects a tab.
    ///
    /// Creates the tab's connector on first use. Returns `None` (and does
    /// nothing) if the tab's URL has no host.
    ///
    /// A tab left waiting for its handshake shows "connecting", even when
    /// the toggle first tore down an older socket.
    pub fn toggle(&self, tab: &TabInfo) -> Option<Connector> {
        let connector = match self.connector(tab.id) {
            Some(connector) => connector,
            None => self.register(tab)?,
        };

        {
            let _hold = connector.hold_events();
            connector.toggle();
            if connector.state() == ConnectionState::AwaitingHandshake {
                self.host.set_indicator(tab.id, &Indicator::connecting());
            }
        }

        Some(connector)
    }

    /// Handles a tab finishing navigation.
    ///
    /// Hosts reset per-tab indicators on navigation, so a connected tab gets
    /// its "connected" indicator back. Nothing else changes.
    pub fn tab_loaded(&self, tab_id: TabId, url: Option<&str>) {
        let Some(connector) = self.connector(tab_id) else {
            return;
        };

        if connector.is_connected() {
            debug!(%tab_id, ?url, "Restoring connected indicator");
            self.host
                .set_indicator(tab_id, &Indicator::connected(connector.target().as_str()));
        }
    }

    /// Handles a tab being closed.
    ///
    /// Disconnects and forgets the tab's connector. Returns `false` if the
    /// tab had none.
    pub fn tab_removed(&self, tab_id: TabId) -> bool {
        let Some(connector) = self.connectors.write().remove(&tab_id) else {
            return false;
        };

        connector.close();
        debug!(%tab_id, "Tab removed");
        true
    }

    /// Disconnects and forgets every tab.
    pub fn shutdown(&self) {
        let connectors: Vec<(TabId, Connector)> = self.connectors.write().drain().collect();
        let count = connectors.len();

        for (_, connector) in connectors {
            connector.close();
        }

        if count > 0 {
            info!(count, "TabManager shut down");
        }
    }
}

// ============================================================================
// TabManager - Internal
// ============================================================================

impl TabManager {
    /// Creates, wires and stores a connector for `tab`.
    fn register(&self, tab: &TabInfo) -> Option<Connector> {
        let url = tab.url.as_deref().unwrap_or_default();
        let target = match target_address(url, self.options.port, &self.options.path) {
            Ok(target) => target,
            Err(e) => {
                warn!(tab_id = %tab.id, error = %e, "No LiveReload target for tab");
                return None;
            }
        };

        let connector = Connector::new(target, Arc::clone(&self.factory));
        self.bind(tab.id, &connector);

        let registered = self
            .connectors
            .write()
            .entry(tab.id)
            .or_insert(connector)
            .clone();

        debug!(tab_id = %tab.id, target_url = %registered.target(), "Connector created");
        Some(registered)
    }

    /// Registers the standard listeners on a new connector.
    fn bind(&self, tab_id: TabId, connector: &Connector) {
        let target = connector.target().to_string();

        let host = Arc::clone(&self.host);
        let connected_target = target.clone();
        connector.on(
            EVENT_CONNECTED,
            listener(move |event: &ConnectorEvent| {
                if matches!(event, ConnectorEvent::Connected) {
                    info!(%tab_id, "Tab connected");
                    host.set_indicator(tab_id, &Indicator::connected(&connected_target));
                }
            }),
        );

        let host = Arc::clone(&self.host);
        connector.on(
            EVENT_DISCONNECT,
            listener(move |event: &ConnectorEvent| {
                if let ConnectorEvent::Disconnected { reason } = event {
                    debug!(%tab_id, ?reason, "Tab disconnected");
                    host.set_indicator(tab_id, &Indicator::disconnected(&target));
                }
            }),
        );

        let host = Arc::clone(&self.host);
        let options = ReloadOptions {
            bypass_cache: self.options.bypass_cache,
        };
        connector.on(
            COMMAND_RELOAD,
            listener(move |event: &ConnectorEvent| {
                let path = event
                    .message()
                    .and_then(|m| m.as_reload())
                    .map(|reload| reload.path);
                info!(%tab_id, ?path, "Reloading tab");
                host.reload(tab_id, options);
            }),
        );
    }
}

impl Drop for TabManager {
    fn drop(&mut self) {
        for (_, connector) in self.connectors.get_mut().drain() {
            connector.close();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
