//! Message-based connection to the dictation server
//!
//! A `Transport` opens one connection per call and hands back a
//! `TransportHandle` for terminating it. Everything the connection observes
//! (open, inbound frames, errors, close) is forwarded as a `TransportEvent`
//! tagged with the connection id, so the session can process events serially
//! and discard ones that belong to a connection it no longer owns.

pub mod messages;
pub mod websocket;

pub use messages::{decode, TranscriptionPayload};
pub use websocket::WebSocketTransport;

use crate::error::{ConnectError, TransportError};
use tokio::sync::mpsc;

/// Identifies one connect attempt
pub type ConnectionId = u64;

/// Receiving end of the session's event channel
pub type EventReceiver = mpsc::UnboundedReceiver<TransportEvent>;

/// One discrete unit of data received over the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

impl Frame {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Frame::Text(text) => text.as_bytes(),
            Frame::Binary(data) => data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEventKind {
    Open,
    Message(Frame),
    Error(TransportError),
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    pub connection: ConnectionId,
    pub kind: TransportEventKind,
}

/// Forwards events of a single connection into the session's channel
///
/// Sends never fail loudly: once the session is gone there is nobody left
/// to care about the connection.
#[derive(Debug, Clone)]
pub struct EventSender {
    connection: ConnectionId,
    tx: mpsc::UnboundedSender<TransportEvent>,
}

impl EventSender {
    pub fn new(connection: ConnectionId, tx: mpsc::UnboundedSender<TransportEvent>) -> Self {
        Self { connection, tx }
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn open(&self) {
        self.send(TransportEventKind::Open);
    }

    pub fn message(&self, frame: Frame) {
        self.send(TransportEventKind::Message(frame));
    }

    pub fn error(&self, error: TransportError) {
        self.send(TransportEventKind::Error(error));
    }

    pub fn close(&self) {
        self.send(TransportEventKind::Close);
    }

    fn send(&self, kind: TransportEventKind) {
        let _ = self.tx.send(TransportEvent {
            connection: self.connection,
            kind,
        });
    }
}

/// Opens connections to a dictation server
pub trait Transport {
    /// Start connecting to `endpoint`
    ///
    /// Returns immediately; the outcome arrives later through `events`.
    /// An `Err` means nothing was started and no events will follow.
    fn open(
        &mut self,
        endpoint: &str,
        events: EventSender,
    ) -> Result<Box<dyn TransportHandle>, ConnectError>;
}

/// Live connection owned by the session
pub trait TransportHandle {
    /// Stop the connection; a `Close` event follows. Safe to call twice.
    fn terminate(&mut self);
}
