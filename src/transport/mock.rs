//! In-memory sockets for unit tests.
//!
//! Tests drive the lifecycle by hand: [`MockSocket::open`],
//! [`MockSocket::receive`], [`MockSocket::remote_close`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use url::Url;

use crate::error::{Error, Result};

use super::socket::{DisconnectReason, Socket, SocketFactory, SocketHandler};

/// Records every socket it opens.
#[derive(Default)]
pub(crate) struct MockSocketFactory {
    opened: Mutex<Vec<Arc<MockSocket>>>,
    refuse: AtomicBool,
}

impl MockSocketFactory {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes subsequent `open` calls fail.
    pub(crate) fn refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub(crate) fn opened_count(&self) -> usize {
        self.opened.lock().len()
    }

    pub(crate) fn socket(&self, index: usize) -> Arc<MockSocket> {
        Arc::clone(&self.opened.lock()[index])
    }

    pub(crate) fn last(&self) -> Arc<MockSocket> {
        let opened = self.opened.lock();
        Arc::clone(opened.last().expect("no socket opened"))
    }
}

impl SocketFactory for MockSocketFactory {
    fn open(&self, url: &Url, handler: Arc<dyn SocketHandler>) -> Result<Arc<dyn Socket>> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(Error::connection("refused by mock"));
        }
        let socket = Arc::new(MockSocket {
            url: url.clone(),
            handler,
            sent: Mutex::new(Vec::new()),
            close_calls: AtomicUsize::new(0),
        });
        self.opened.lock().push(Arc::clone(&socket));
        Ok(socket)
    }
}

pub(crate) struct MockSocket {
    pub(crate) url: Url,
    handler: Arc<dyn SocketHandler>,
    sent: Mutex<Vec<String>>,
    close_calls: AtomicUsize,
}

impl MockSocket {
    pub(crate) fn open(&self) {
        self.handler.on_open();
    }

    pub(crate) fn receive(&self, text: &str) {
        self.handler.on_message(text);
    }

    pub(crate) fn remote_close(&self, reason: Option<DisconnectReason>) {
        self.handler.on_close(reason);
    }

    pub(crate) fn fail(&self, message: &str) {
        self.handler.on_error(DisconnectReason::error(message));
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub(crate) fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

impl Socket for MockSocket {
    fn send_text(&self, text: String) -> Result<()> {
        if self.close_calls() > 0 {
            return Err(Error::ConnectionClosed);
        }
        self.sent.lock().push(text);
        Ok(())
    }

    fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}
