//! Named event channels.
//!
//! [`EventEmitter`] maps an event name to an ordered list of listeners.
//! Listeners are compared by identity ([`Arc::ptr_eq`]), so keep the
//! [`Listener`] handle around if you intend to call [`EventEmitter::off`].
//!
//! # Example
//!
//! ```ignore
//! let emitter = EventEmitter::<u32>::new();
//! let print = listener(|n: &u32| println!("got {n}"));
//!
//! emitter.on("tick", Arc::clone(&print));
//! emitter.fire("tick", &1);
//! emitter.off("tick", &print);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

// ============================================================================
// Types
// ============================================================================

/// Listener callback for payloads of type `E`.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Wraps a closure as a [`Listener`].
#[inline]
pub fn listener<E, F>(f: F) -> Listener<E>
where
    F: Fn(&E) + Send + Sync + 'static,
{
    Arc::new(f)
}

// ============================================================================
// EventEmitter
// ============================================================================

/// Publish/subscribe primitive with named channels.
///
/// Invocation is synchronous and in registration order. A listener that
/// panics is not isolated: the panic unwinds through [`fire`](Self::fire)
/// and the remaining listeners for that call are skipped.
pub struct EventEmitter<E> {
    listeners: RwLock<FxHashMap<String, Vec<Listener<E>>>>,
}

impl<E> EventEmitter<E> {
    /// Creates an emitter with no listeners.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(FxHashMap::default()),
        }
    }

    /// Registers `listener` for `event`.
    ///
    /// No de-duplication: registering the same listener twice makes it run
    /// twice per [`fire`](Self::fire).
    pub fn on(&self, event: impl Into<String>, listener: Listener<E>) {
        self.listeners
            .write()
            .entry(event.into())
            .or_default()
            .push(listener);
    }

    /// Removes the first registration of `listener` for `event`.
    ///
    /// Returns `false` (and does nothing) if it was not registered.
    pub fn off(&self, event: &str, listener: &Listener<E>) -> bool {
        let mut listeners = self.listeners.write();
        let Some(registered) = listeners.get_mut(event) else {
            return false;
        };
        let Some(index) = registered.iter().position(|l| Arc::ptr_eq(l, listener)) else {
            return false;
        };
        registered.remove(index);
        if registered.is_empty() {
            listeners.remove(event);
        }
        true
    }

    /// Invokes every listener registered for `event` with `payload`.
    ///
    /// The listener list is snapshotted first, so listeners may register or
    /// remove listeners while running. Returns the number of listeners run.
    pub fn fire(&self, event: &str, payload: &E) -> usize {
        let snapshot: Vec<Listener<E>> = match self.listeners.read().get(event) {
            Some(registered) => registered.clone(),
            None => return 0,
        };
        for listener in &snapshot {
            listener(payload);
        }
        snapshot.len()
    }

    /// Returns how many listeners are registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.read().get(event).map_or(0, Vec::len)
    }
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.read();
        let mut events: Vec<(&String, usize)> =
            listeners.iter().map(|(name, l)| (name, l.len())).collect();
        events.sort();
        f.debug_struct("EventEmitter")
            .field("events", &events)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
