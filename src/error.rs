use thiserror::Error;

/// Raised synchronously when a transport cannot even be started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("unsupported scheme {scheme:?} in endpoint {endpoint:?} (expected ws or wss)")]
    UnsupportedScheme { endpoint: String, scheme: String },

    #[error("no async runtime available to drive the connection")]
    NoRuntime,
}

/// Delivered asynchronously through the transport's error event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An inbound frame that does not carry a transcription
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed transcription frame: {0}")]
    Malformed(String),
}
