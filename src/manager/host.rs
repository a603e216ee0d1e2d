//! Host seam: the tab surface the manager drives.
//!
//! The host is whatever embeds this crate (a browser extension background
//! page, a test harness, a CLI). It owns the tabs; the manager only asks it
//! to update a tab's indicator or reload the tab.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use crate::identifiers::TabId;

// ============================================================================
// TabInfo
// ============================================================================

/// A tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    /// Host tab identifier.
    pub id: TabId,
    /// Current URL, when the host exposes it.
    pub url: Option<String>,
}

impl TabInfo {
    /// Creates a tab descriptor with a URL.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<TabId>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: Some(url.into()),
        }
    }

    /// Creates a tab descriptor without a URL.
    #[inline]
    #[must_use]
    pub fn without_url(id: impl Into<TabId>) -> Self {
        Self {
            id: id.into(),
            url: None,
        }
    }
}

// ============================================================================
// Indicator
// ============================================================================

/// Visual connection state of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorState {
    /// A connection attempt is in progress.
    Connecting,
    /// Handshake accepted.
    Connected,
    /// No connection.
    Disconnected,
}

impl IndicatorState {
    /// Icon shown for this state.
    #[inline]
    #[must_use]
    pub const fn icon_path(self) -> &'static str {
        match self {
            Self::Connecting => "icons/connecting.png",
            Self::Connected => "icons/on.png",
            Self::Disconnected => "icons/off.png",
        }
    }
}

impl fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

/// Icon and title to show for a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    /// Visual state.
    pub state: IndicatorState,
    /// Tooltip text.
    pub title: String,
}

impl Indicator {
    /// Connection attempt in progress.
    #[must_use]
    pub fn connecting() -> Self {
        Self {
            state: IndicatorState::Connecting,
            title: "Connecting...".to_string(),
        }
    }

    /// Connected to `target`.
    #[must_use]
    pub fn connected(target: &str) -> Self {
        Self {
            state: IndicatorState::Connected,
            title: format!("Connected to {target}"),
        }
    }

    /// Disconnected from `target`.
    #[must_use]
    pub fn disconnected(target: &str) -> Self {
        Self {
            state: IndicatorState::Disconnected,
            title: format!("Disconnected from {target}"),
        }
    }

    /// Icon shown for this indicator.
    #[inline]
    #[must_use]
    pub fn icon_path(&self) -> &'static str {
        self.state.icon_path()
    }
}

// ============================================================================
// ReloadOptions
// ============================================================================

/// Options for [`TabHost::reload`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadOptions {
    /// Skip the HTTP cache.
    pub bypass_cache: bool,
}

// ============================================================================
// TabHost
// ============================================================================

/// Tab actions provided by the host.
///
/// Calls arrive from socket callbacks and must not block.
pub trait TabHost: Send + Sync {
    /// Shows `indicator` on the tab.
    fn set_indicator(&self, tab_id: TabId, indicator: &Indicator);

    /// Reloads the tab's content.
    fn reload(&self, tab_id: TabId, options: ReloadOptions);

    /// Returns the active tab of the focused window.
    ///
    /// Used when an activation arrives without a tab.
    fn active_tab(&self) -> Option<TabInfo> {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_titles() {
        assert_eq!(Indicator::connecting().title, "Connecting...");
        assert_eq!(
            Indicator::connected("ws://a:35729/livereload").title,
            "Connected to ws://a:35729/livereload"
        );
        assert_eq!(
            Indicator::disconnected("ws://a:35729/livereload").title,
            "Disconnected from ws://a:35729/livereload"
        );
    }

    #[test]
    fn test_icon_paths() {
        assert_eq!(Indicator::connecting().icon_path(), "icons/connecting.png");
        assert_eq!(Indicator::connected("x").icon_path(), "icons/on.png");
        assert_eq!(Indicator::disconnected("x").icon_path(), "icons/off.png");
    }

    #[test]
    fn test_reload_options_default() {
        assert!(!ReloadOptions::default().bypass_cache);
    }

    #[test]
    fn test_tab_info() {
        let tab = TabInfo::new(3, "http://localhost/");
        assert_eq!(tab.id, TabId::new(3));
        assert_eq!(tab.url.as_deref(), Some("http://localhost/"));
        assert_eq!(TabInfo::without_url(4).url, None);
    }
}
