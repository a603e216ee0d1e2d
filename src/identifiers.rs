//! Type-safe identifiers.
//!
//! The host hands out tab identifiers as plain integers. Wrapping them keeps
//! them from being confused with socket generations or ports.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// TabId
// ============================================================================

/// Opaque tab identifier assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(i64);

impl TabId {
    /// Wraps a host tab identifier.
    #[inline]
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw host value.
    #[inline]
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for TabId {
    #[inline]
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i32> for TabId {
    #[inline]
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_id_display() {
        assert_eq!(TabId::new(42).to_string(), "42");
    }

    #[test]
    fn test_tab_id_serializes_as_integer() {
        let json = serde_json::to_string(&TabId::new(7)).expect("serialize");
        assert_eq!(json, "7");
    }
}
