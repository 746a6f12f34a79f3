use std::fmt;
use tracing::info;

/// Connection state as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Disconnected,
    Connected,
    FailedToConnect,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Disconnected => "Disconnected",
            Status::Connected => "Connected",
            Status::FailedToConnect => "failed to connect",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the session reports what it is doing
pub trait StatusReporter {
    fn report(&mut self, status: Status);

    /// Short-lived message, e.g. "Starting dictation."
    fn notice(&mut self, message: &str) {
        info!("{}", message);
    }
}

/// A single human-readable status slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
    notice: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self {
            text: Status::Disconnected.to_string(),
            notice: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Most recent notice, if any
    pub fn last_notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter for StatusLine {
    fn report(&mut self, status: Status) {
        info!("Dictation status: {}", status);
        self.text = status.to_string();
    }

    fn notice(&mut self, message: &str) {
        info!("{}", message);
        self.notice = Some(message.to_string());
    }
}
