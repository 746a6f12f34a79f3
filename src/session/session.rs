use super::state::SessionState;
use super::stats::SessionStats;
use crate::document::Workspace;
use crate::error::TransportError;
use crate::status::{Status, StatusReporter};
use crate::transport::{
    self, ConnectionId, EventReceiver, EventSender, Frame, Transport, TransportEvent,
    TransportEventKind, TransportHandle,
};
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The connection the session currently owns
struct ActiveConnection {
    id: ConnectionId,
    handle: Box<dyn TransportHandle>,
}

/// A dictation session that owns at most one connection to the server and
/// writes every transcription it receives into the focused document
///
/// All methods run on the caller's thread. Transport events arrive on the
/// `EventReceiver` returned by [`DictationSession::new`] and must be fed back
/// through [`DictationSession::handle_event`] in the order received.
pub struct DictationSession<T, W, S> {
    /// Server address read by each toggle
    endpoint: String,

    state: SessionState,

    /// Live connection, if any
    connection: Option<ActiveConnection>,

    /// Id handed to the most recent connect attempt
    last_connection_id: ConnectionId,

    /// Set once by `shutdown`; all later events are ignored
    shut_down: bool,

    transport: T,
    workspace: W,
    status: S,

    /// Cloned into an `EventSender` for each new connection
    events: mpsc::UnboundedSender<TransportEvent>,

    stats: SessionStats,
}

impl<T, W, S> DictationSession<T, W, S>
where
    T: Transport,
    W: Workspace,
    S: StatusReporter,
{
    /// Create an idle session and the channel its transport events arrive on
    pub fn new(
        endpoint: impl Into<String>,
        transport: T,
        workspace: W,
        status: S,
    ) -> (Self, EventReceiver) {
        let endpoint = endpoint.into();
        let (events, receiver) = mpsc::unbounded_channel();

        info!("Creating dictation session for {}", endpoint);

        let stats = SessionStats {
            state: SessionState::Idle,
            endpoint: endpoint.clone(),
            connected_at: None,
            frames_received: 0,
            transcripts_inserted: 0,
            decode_failures: 0,
            unfocused_drops: 0,
        };

        let session = Self {
            endpoint,
            state: SessionState::Idle,
            connection: None,
            last_connection_id: 0,
            shut_down: false,
            transport,
            workspace,
            status,
            events,
            stats,
        };

        (session, receiver)
    }

    /// Start a session when idle or failed, stop it when connected
    ///
    /// Ignored while a connect attempt is still in flight.
    pub fn toggle(&mut self) {
        if self.shut_down {
            warn!("Toggle after shutdown ignored");
            return;
        }

        match self.state {
            SessionState::Idle | SessionState::Failed => self.connect(),
            SessionState::Connecting => {
                info!("Connection attempt in progress, ignoring toggle");
            }
            SessionState::Connected => self.disconnect(),
        }
    }

    /// Route one transport event to its handler
    ///
    /// Events from connections the session no longer owns are dropped.
    pub fn handle_event(&mut self, event: TransportEvent) {
        if self.shut_down {
            debug!("Ignoring event from connection {} after shutdown", event.connection);
            return;
        }

        let current = self.connection.as_ref().map(|c| c.id);
        if current != Some(event.connection) {
            debug!(
                "Ignoring event from stale connection {} (current: {:?})",
                event.connection, current
            );
            return;
        }

        match event.kind {
            TransportEventKind::Open => self.on_open(),
            TransportEventKind::Message(frame) => self.on_message(&frame),
            TransportEventKind::Error(err) => self.on_error(err),
            TransportEventKind::Close => self.on_close(),
        }
    }

    fn on_open(&mut self) {
        if self.state != SessionState::Connecting {
            warn!("Open event while {}, ignoring", self.state);
            return;
        }

        info!("Connected to dictation server at {}", self.endpoint);
        self.set_state(SessionState::Connected);
        self.stats.connected_at = Some(Utc::now());
        self.status.report(Status::Connected);
    }

    fn on_message(&mut self, frame: &Frame) {
        if self.state != SessionState::Connected {
            debug!("Dropping frame received while {}", self.state);
            return;
        }

        self.stats.frames_received += 1;

        let payload = match transport::decode(frame) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to decode transcription frame: {}", e);
                self.stats.decode_failures += 1;
                return;
            }
        };

        // Looked up per message: focus may have moved since the last one
        match self.workspace.active_document() {
            Some(document) => {
                debug!("Inserting transcription ({} bytes)", payload.text.len());
                document.replace_selection(&format!("{}\n", payload.text));
                self.stats.transcripts_inserted += 1;
            }
            None => {
                debug!("No focused document, dropping transcription");
                self.stats.unfocused_drops += 1;
            }
        }
    }

    /// Surface a transport error
    ///
    /// A failed connect attempt moves the session to `Failed` and releases
    /// the handle. On an open connection only the status changes; the
    /// transport's following close event returns the session to `Idle`.
    fn on_error(&mut self, err: TransportError) {
        warn!("Dictation transport error: {}", err);
        self.status.report(Status::FailedToConnect);

        if self.state == SessionState::Connecting {
            self.release_connection();
            self.set_state(SessionState::Failed);
        }
    }

    fn on_close(&mut self) {
        info!("Disconnected from dictation server");
        self.connection = None;
        self.stats.connected_at = None;
        self.set_state(SessionState::Idle);
        self.status.report(Status::Disconnected);
    }

    /// Tear the session down; safe in any state and idempotent
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }

        info!("Shutting down dictation session");
        let was_active = self.state != SessionState::Idle || self.connection.is_some();
        self.release_connection();
        self.stats.connected_at = None;
        self.set_state(SessionState::Idle);
        self.shut_down = true;

        // The close event that would normally report this is never processed
        if was_active {
            self.status.report(Status::Disconnected);
        }
    }

    /// Change the address used by the next connect attempt
    pub fn set_endpoint_address(&mut self, endpoint: impl Into<String>) {
        self.endpoint = endpoint.into();
        self.stats.endpoint = self.endpoint.clone();
        info!("Dictation endpoint set to {}", self.endpoint);
    }

    pub fn endpoint_address(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a transport handle is currently owned
    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.clone()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut W {
        &mut self.workspace
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    fn connect(&mut self) {
        // A handle lingering after an optimistic disconnect is replaced
        self.release_connection();

        self.last_connection_id += 1;
        let id = self.last_connection_id;
        let events = EventSender::new(id, self.events.clone());

        self.status.notice("Starting dictation.");

        match self.transport.open(&self.endpoint, events) {
            Ok(handle) => {
                self.connection = Some(ActiveConnection { id, handle });
                self.set_state(SessionState::Connecting);
            }
            Err(e) => {
                error!("Failed to connect to {}: {}", self.endpoint, e);
                self.set_state(SessionState::Failed);
                self.status.report(Status::FailedToConnect);
            }
        }
    }

    fn disconnect(&mut self) {
        info!("Closing dictation connection");
        if let Some(connection) = self.connection.as_mut() {
            connection.handle.terminate();
        }
        // The close event confirms the transition and updates the status
        self.set_state(SessionState::Idle);
    }

    fn release_connection(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            debug!("Releasing connection {}", connection.id);
            connection.handle.terminate();
        }
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            debug!("Session state {} -> {}", self.state, state);
        }
        self.state = state;
        self.stats.state = state;
    }
}
