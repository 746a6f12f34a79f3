pub mod config;
pub mod document;
pub mod error;
pub mod session;
pub mod status;
pub mod transport;

pub use config::{JsonSettingsStore, Settings, SettingsStore, DEFAULT_ENDPOINT};
pub use document::{DocumentSink, SingleDocumentWorkspace, TextBuffer, Workspace};
pub use error::{ConnectError, DecodeError, TransportError};
pub use session::{DictationSession, SessionState, SessionStats};
pub use status::{Status, StatusLine, StatusReporter};
pub use transport::{
    decode, EventReceiver, EventSender, Frame, TranscriptionPayload, Transport, TransportEvent,
    TransportEventKind, TransportHandle, WebSocketTransport,
};
