//! Target address derivation.
//!
//! A tab URL only contributes its host. The scheme, port and path of the
//! page are discarded and replaced by the LiveReload endpoint:
//!
//! | Tab URL | Target |
//! |---------|--------|
//! | `https://app.test/index.html` | `ws://app.test:35729/livereload` |
//! | `http://127.0.0.1:8080/` | `ws://127.0.0.1:35729/livereload` |
//! | `localhost:3000/page` | `ws://localhost:35729/livereload` |
//! | `file:///tmp/page.html` | error (no host) |

// ============================================================================
// Imports
// ============================================================================

use std::borrow::Cow;

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Port the LiveReload server listens on.
pub const DEFAULT_PORT: u16 = 35729;

/// WebSocket endpoint path on the LiveReload server.
pub const DEFAULT_PATH: &str = "/livereload";

// ============================================================================
// Functions
// ============================================================================

/// Extracts the host from a tab URL.
///
/// A URL without a scheme separator is read as `http://<url>`.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if the URL cannot be parsed or has no host.
pub fn extract_host(tab_url: &str) -> Result<String> {
    let trimmed = tab_url.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_url(tab_url, "empty URL"));
    }

    let candidate: Cow<'_, str> = if trimmed.contains("://") {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("http://{trimmed}"))
    };

    let parsed = Url::parse(&candidate).map_err(|e| Error::invalid_url(tab_url, e.to_string()))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_owned()),
        _ => Err(Error::invalid_url(tab_url, "URL has no host")),
    }
}

/// Derives the WebSocket target for a tab URL.
///
/// # Arguments
///
/// * `tab_url` - Current URL of the tab
/// * `port` - LiveReload server port
/// * `path` - Endpoint path, starting with `/`
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if no host can be extracted.
pub fn target_address(tab_url: &str, port: u16, path: &str) -> Result<Url> {
    let host = extract_host(tab_url)?;
    let target = format!("ws://{host}:{port}{path}");
    Url::parse(&target).map_err(|e| Error::invalid_url(tab_url, e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
