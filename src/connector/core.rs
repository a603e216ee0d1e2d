//! Per-tab connection state machine.
//!
//! # States
//!
//! ```text
//!                connect()                 hello reply
//! Disconnected ───────────► AwaitingHandshake ─────────► Connected
//!      ▲                          │                          │
//!      └──────────────────────────┴──────────────────────────┘
//!            disconnect() / remote close / transport error
//! ```
//!
//! Every socket is bound to a generation number. Tearing a socket down bumps
//! the generation, which detaches the old socket's callbacks: anything it
//! still reports is ignored.
//!
//! # Event Ordering
//!
//! A state change and the event it causes happen under one per-connector
//! dispatch lock. Socket callbacks and calls from other threads wait for it,
//! so listeners observe events in the order the state changed. The lock is
//! reentrant: listeners may call back into the same connector.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::protocol::{Hello, Message};
use crate::transport::{DisconnectReason, Socket, SocketFactory, SocketHandler};

use super::emitter::{EventEmitter, Listener};
use super::state::{ConnectionState, ConnectorEvent, EVENT_CONNECTED, EVENT_DISCONNECT};

// ============================================================================
// Types
// ============================================================================

/// Mutable connection state, guarded by one lock.
#[derive(Default)]
struct SocketState {
    /// Protocol state.
    connection: ConnectionState,
    /// The live socket, if any.
    socket: Option<Arc<dyn Socket>>,
    /// Generation of the current socket binding.
    generation: u64,
    /// `on_open` arrived for the current generation.
    opened: bool,
}

/// Internal shared state for a connector.
struct ConnectorInner {
    /// WebSocket target, fixed at creation.
    target: Url,
    /// Opens sockets.
    factory: Arc<dyn SocketFactory>,
    /// Listener table.
    emitter: EventEmitter<ConnectorEvent>,
    /// Serializes state transitions with their events.
    dispatch: ReentrantMutex<()>,
    /// Connection state.
    state: Mutex<SocketState>,
}

/// Holds back this connector's events. See [`Connector::hold_events`].
#[must_use = "events are released as soon as the hold is dropped"]
pub struct EventHold<'a> {
    _guard: ReentrantMutexGuard<'a, ()>,
}

// ============================================================================
// Connector
// ============================================================================

/// One logical LiveReload connection.
///
/// Cloning yields another handle to the same connector.
///
/// # Events
///
/// | Name | Payload |
/// |------|---------|
/// | `connected` | [`ConnectorEvent::Connected`] |
/// | `disconnect` | [`ConnectorEvent::Disconnected`] |
/// | `<command>` | [`ConnectorEvent::Command`] |
#[derive(Clone)]
pub struct Connector {
    inner: Arc<ConnectorInner>,
}

impl fmt::Debug for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("target", &self.inner.target.as_str())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Connector {
    /// Creates a disconnected connector for `target`.
    #[must_use]
    pub fn new(target: Url, factory: Arc<dyn SocketFactory>) -> Self {
        Self {
            inner: Arc::new(ConnectorInner {
                target,
                factory,
                emitter: EventEmitter::new(),
                dispatch: ReentrantMutex::new(()),
                state: Mutex::new(SocketState::default()),
            }),
        }
    }
}

// ============================================================================
// Connector - Accessors
// ============================================================================

impl Connector {
    /// Returns the WebSocket target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> &Url {
        &self.inner.target
    }

    /// Returns the current protocol state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.inner.state.lock().connection
    }

    /// Returns `true` once the handshake has been accepted.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Returns `true` if both handles refer to the same connector.
    #[inline]
    #[must_use]
    pub fn same_as(&self, other: &Connector) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

// ============================================================================
// Connector - Events
// ============================================================================

impl Connector {
    /// Registers a listener. See [`EventEmitter::on`].
    #[inline]
    pub fn on(&self, event: impl Into<String>, listener: Listener<ConnectorEvent>) {
        self.inner.emitter.on(event, listener);
    }

    /// Removes a listener. See [`EventEmitter::off`].
    #[inline]
    pub fn off(&self, event: &str, listener: &Listener<ConnectorEvent>) -> bool {
        self.inner.emitter.off(event, listener)
    }

    /// Fires an event on this connector. See [`EventEmitter::fire`].
    #[inline]
    pub fn fire(&self, event: &str, payload: &ConnectorEvent) -> usize {
        let _dispatch = self.inner.dispatch.lock();
        self.inner.emitter.fire(event, payload)
    }

    /// Blocks transitions and events driven from other threads until the
    /// returned hold is dropped.
    ///
    /// The current thread keeps full access, so a caller can act on the
    /// connector and then read a state that no socket callback can change
    /// underneath it.
    #[inline]
    pub fn hold_events(&self) -> EventHold<'_> {
        EventHold {
            _guard: self.inner.dispatch.lock(),
        }
    }
}

// ============================================================================
// Connector - Lifecycle
// ============================================================================

impl Connector {
    /// Opens a new socket, tearing down the current one first.
    ///
    /// The handshake is sent once the socket reports open. If the socket
    /// cannot even be started, the connector goes straight back to
    /// `Disconnected` and fires `disconnect` with the error.
    pub fn connect(&self) {
        let _dispatch = self.inner.dispatch.lock();
        self.inner.teardown(None, None);

        let generation = {
            let mut state = self.inner.state.lock();
            state.generation += 1;
            state.connection = ConnectionState::AwaitingHandshake;
            state.opened = false;
            state.generation
        };

        debug!(target_url = %self.inner.target, generation, "Opening socket");

        let handler: Arc<dyn SocketHandler> = Arc::new(SocketBinding {
            connector: Arc::downgrade(&self.inner),
            generation,
        });

        let socket = match self.inner.factory.open(&self.inner.target, handler) {
            Ok(socket) => socket,
            Err(e) => {
                warn!(target_url = %self.inner.target, error = %e, "Failed to open socket");
                self.inner
                    .teardown(Some(generation), Some(DisconnectReason::error(e.to_string())));
                return;
            }
        };

        let (stored, opened) = {
            let mut state = self.inner.state.lock();
            if state.generation == generation {
                state.socket = Some(Arc::clone(&socket));
                (true, state.opened)
            } else {
                (false, false)
            }
        };

        if !stored {
            socket.close();
        } else if opened {
            self.inner.send_hello(generation, socket.as_ref());
        }
    }

    /// Alias for [`connect`](Self::connect).
    #[inline]
    pub fn init(&self) {
        self.connect();
    }

    /// Closes the socket and fires `disconnect` with no reason.
    ///
    /// Returns `false` (and fires nothing) if already disconnected.
    pub fn disconnect(&self) -> bool {
        self.inner.teardown(None, None)
    }

    /// Alias for [`disconnect`](Self::disconnect).
    #[inline]
    pub fn close(&self) -> bool {
        self.disconnect()
    }

    /// Disconnects if connected, otherwise (re)connects.
    ///
    /// A connector still waiting for its handshake reply is reconnected.
    pub fn toggle(&self) {
        let _dispatch = self.inner.dispatch.lock();
        if self.is_connected() {
            self.disconnect();
        } else {
            self.connect();
        }
    }
}

// ============================================================================
// ConnectorInner - State Machine
// ============================================================================

impl ConnectorInner {
    /// Returns `true` if `generation` is still the live binding.
    fn is_current(&self, generation: u64) -> bool {
        self.state.lock().generation == generation
    }

    /// Tears the current socket down.
    ///
    /// With `expected` set, only acts if that generation is still current.
    fn teardown(&self, expected: Option<u64>, reason: Option<DisconnectReason>) -> bool {
        let _dispatch = self.dispatch.lock();
        let socket = {
            let mut state = self.state.lock();
            if expected.is_some_and(|g| g != state.generation) {
                return false;
            }
            if state.socket.is_none() && !state.connection.has_socket() {
                return false;
            }
            state.generation += 1;
            state.connection = ConnectionState::Disconnected;
            state.opened = false;
            state.socket.take()
        };

        if let Some(socket) = socket {
            socket.close();
        }

        match &reason {
            Some(reason) => info!(target_url = %self.target, %reason, "Disconnected"),
            None => info!(target_url = %self.target, "Disconnected"),
        }

        self.emitter
            .fire(EVENT_DISCONNECT, &ConnectorEvent::Disconnected { reason });
        true
    }

    /// Sends the handshake request.
    fn send_hello(&self, generation: u64, socket: &dyn Socket) {
        let sent = Hello::new()
            .to_frame()
            .and_then(|frame| socket.send_text(frame));

        match sent {
            Ok(()) => debug!(target_url = %self.target, "Handshake sent"),
            Err(e) => {
                warn!(target_url = %self.target, error = %e, "Failed to send handshake");
                self.teardown(Some(generation), Some(DisconnectReason::error(e.to_string())));
            }
        }
    }

    fn handle_open(&self, generation: u64) {
        let _dispatch = self.dispatch.lock();
        let socket = {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            state.opened = true;
            state.socket.clone()
        };

        // Without a stored socket, connect() sends the handshake once it
        // stores one.
        if let Some(socket) = socket {
            self.send_hello(generation, socket.as_ref());
        }
    }

    fn handle_message(&self, generation: u64, text: &str) {
        let _dispatch = self.dispatch.lock();
        let connection = {
            let state = self.state.lock();
            if state.generation != generation {
                return;
            }
            state.connection
        };

        trace!(target_url = %self.target, frame = text, "Frame received");

        let message = match Message::parse(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(target_url = %self.target, error = %e, "Dropping unparseable frame");
                return;
            }
        };

        if connection != ConnectionState::Connected {
            self.handle_handshake(generation, &message);
            return;
        }

        let Some(command) = message.command.clone() else {
            debug!(target_url = %self.target, "Dropping frame without command");
            return;
        };

        let listeners = self.emitter.fire(&command, &ConnectorEvent::Command(message));
        debug!(target_url = %self.target, command = %command, listeners, "Command dispatched");
    }

    /// Runs with the dispatch lock held by [`handle_message`](Self::handle_message).
    fn handle_handshake(&self, generation: u64, message: &Message) {
        if !message.is_handshake_reply() {
            debug!(
                target_url = %self.target,
                command = ?message.command(),
                "Ignoring frame while awaiting handshake"
            );
            return;
        }

        {
            let mut state = self.state.lock();
            if state.generation != generation || state.connection == ConnectionState::Connected {
                return;
            }
            state.connection = ConnectionState::Connected;
        }

        info!(target_url = %self.target, "Handshake accepted");
        self.emitter.fire(EVENT_CONNECTED, &ConnectorEvent::Connected);
    }
}

impl Drop for ConnectorInner {
    fn drop(&mut self) {
        if let Some(socket) = self.state.get_mut().socket.take() {
            socket.close();
        }
    }
}

// ============================================================================
// SocketBinding
// ============================================================================

/// Routes one socket's callbacks to its connector.
struct SocketBinding {
    connector: Weak<ConnectorInner>,
    generation: u64,
}

impl SocketBinding {
    fn connector(&self) -> Option<Arc<ConnectorInner>> {
        self.connector
            .upgrade()
            .filter(|inner| inner.is_current(self.generation))
    }
}

impl SocketHandler for SocketBinding {
    fn on_open(&self) {
        if let Some(inner) = self.connector() {
            inner.handle_open(self.generation);
        }
    }

    fn on_message(&self, text: &str) {
        if let Some(inner) = self.connector() {
            inner.handle_message(self.generation, text);
        }
    }

    fn on_close(&self, reason: Option<DisconnectReason>) {
        if let Some(inner) = self.connector() {
            inner.teardown(Some(self.generation), reason);
        }
    }

    fn on_error(&self, reason: DisconnectReason) {
        if let Some(inner) = self.connector() {
            inner.teardown(Some(self.generation), Some(reason));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
