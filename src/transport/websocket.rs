//! WebSocket client sockets.
//!
//! [`WsSocketFactory`] implements the socket seam on top of
//! `tokio-tungstenite`. Each opened socket is served by its own tokio task.
//!
//! # Event Loop
//!
//! The task handles:
//!
//! - Connecting to the target (frames queued meanwhile are flushed on open)
//! - Incoming text frames, forwarded to the handler
//! - Outgoing frames from [`Socket::send_text`]
//! - Shutdown from [`Socket::close`]

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::error::{Error, Result};

use super::socket::{DisconnectReason, Socket, SocketFactory, SocketHandler};

// ============================================================================
// Constants
// ============================================================================

/// Default limit for the TCP connect and WebSocket upgrade.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

// ============================================================================
// SocketCommand
// ============================================================================

/// Internal commands for the socket task.
enum SocketCommand {
    /// Send a text frame.
    Send(String),
    /// Close the socket.
    Shutdown,
}

// ============================================================================
// WsSocketFactory
// ============================================================================

/// Opens `tokio-tungstenite` client sockets.
///
/// # Example
///
/// ```ignore
/// let factory = WsSocketFactory::new()?;
/// let manager = TabManager::builder()
///     .host(host)
///     .socket_factory(Arc::new(factory))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct WsSocketFactory {
    /// Runtime the socket tasks are spawned on.
    runtime: Handle,
    /// Limit for connecting to the server.
    connect_timeout: Duration,
}

impl WsSocketFactory {
    /// Creates a factory bound to the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if called outside a tokio runtime.
    pub fn new() -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::config(format!("WsSocketFactory needs a tokio runtime: {e}")))?;
        Ok(Self::with_handle(runtime))
    }

    /// Creates a factory spawning on the given runtime.
    #[inline]
    #[must_use]
    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Sets the connect timeout.
    #[inline]
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Returns the connect timeout.
    #[inline]
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

impl SocketFactory for WsSocketFactory {
    fn open(&self, url: &Url, handler: Arc<dyn SocketHandler>) -> Result<Arc<dyn Socket>> {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        self.runtime.spawn(run_socket(
            url.clone(),
            command_rx,
            handler,
            self.connect_timeout,
        ));

        Ok(Arc::new(WsSocket { command_tx }))
    }
}

// ============================================================================
// WsSocket
// ============================================================================

/// Handle to a socket task.
struct WsSocket {
    /// Channel for sending commands to the task.
    command_tx: mpsc::UnboundedSender<SocketCommand>,
}

impl Socket for WsSocket {
    fn send_text(&self, text: String) -> Result<()> {
        self.command_tx
            .send(SocketCommand::Send(text))
            .map_err(|_| Error::ConnectionClosed)
    }

    fn close(&self) {
        let _ = self.command_tx.send(SocketCommand::Shutdown);
    }
}

// ============================================================================
// Event Loop
// ============================================================================

/// Connects and then serves one socket until it closes.
async fn run_socket(
    url: Url,
    mut command_rx: mpsc::UnboundedReceiver<SocketCommand>,
    handler: Arc<dyn SocketHandler>,
    connect_timeout: Duration,
) {
    let mut queued = Vec::new();

    let connecting = connect(&url, connect_timeout);
    tokio::pin!(connecting);

    let ws_stream = loop {
        tokio::select! {
            result = &mut connecting => {
                match result {
                    Ok(stream) => break stream,
                    Err(e) => {
                        warn!(%url, error = %e, "WebSocket connect failed");
                        handler.on_error(DisconnectReason::error(e.to_string()));
                        return;
                    }
                }
            }

            command = command_rx.recv() => {
                match command {
                    Some(SocketCommand::Send(text)) => queued.push(text),
                    Some(SocketCommand::Shutdown) | None => {
                        debug!(%url, "Socket closed before open");
                        return;
                    }
                }
            }
        }
    };

    info!(%url, "WebSocket connection established");

    let (mut ws_write, mut ws_read) = ws_stream.split();

    handler.on_open();

    for text in queued {
        if let Err(e) = send_frame(&mut ws_write, text).await {
            handler.on_error(DisconnectReason::error(e.to_string()));
            return;
        }
    }

    loop {
        tokio::select! {
            message = ws_read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        trace!(%url, frame = text.as_str(), "Frame received");
                        handler.on_message(text.as_str());
                    }

                    Some(Ok(Message::Close(frame))) => {
                        let reason = frame.map_or_else(
                            || DisconnectReason::closed(None, ""),
                            |f| DisconnectReason::closed(Some(u16::from(f.code)), f.reason.as_str()),
                        );
                        info!(%url, %reason, "WebSocket closed by remote");
                        handler.on_close(Some(reason));
                        break;
                    }

                    Some(Err(e)) => {
                        warn!(%url, error = %e, "WebSocket error");
                        handler.on_error(DisconnectReason::error(e.to_string()));
                        break;
                    }

                    None => {
                        debug!(%url, "WebSocket stream ended");
                        handler.on_close(None);
                        break;
                    }

                    // Ignore Binary, Ping, Pong
                    _ => {}
                }
            }

            command = command_rx.recv() => {
                match command {
                    Some(SocketCommand::Send(text)) => {
                        trace!(%url, frame = text.as_str(), "Frame sent");
                        if let Err(e) = send_frame(&mut ws_write, text).await {
                            warn!(%url, error = %e, "Failed to send frame");
                            handler.on_error(DisconnectReason::error(e.to_string()));
                            break;
                        }
                    }

                    Some(SocketCommand::Shutdown) | None => {
                        debug!(%url, "Socket shutdown requested");
                        let _ = ws_write.close().await;
                        break;
                    }
                }
            }
        }
    }

    debug!(%url, "Socket task terminated");
}

/// Connects to `url` within `connect_timeout`.
async fn connect(url: &Url, connect_timeout: Duration) -> Result<WsStream> {
    let (stream, _response) = timeout(connect_timeout, connect_async(url.as_str()))
        .await
        .map_err(|_| {
            Error::connection(format!(
                "connect timed out after {}ms",
                connect_timeout.as_millis()
            ))
        })??;
    Ok(stream)
}

async fn send_frame(sink: &mut WsSink, text: String) -> Result<()> {
    sink.send(Message::Text(text.into())).await?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
