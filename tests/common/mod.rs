// Scripted transport for driving the session state machine without a network.

#![allow(dead_code)]

use dictation_bridge::{
    ConnectError, DictationSession, EventReceiver, EventSender, SingleDocumentWorkspace,
    StatusLine, TextBuffer, Transport, TransportHandle,
};
use std::cell::Cell;
use std::rc::Rc;

pub type FakeSession = DictationSession<FakeTransport, SingleDocumentWorkspace, StatusLine>;

/// One `open` call seen by the fake transport
pub struct OpenedConnection {
    pub endpoint: String,
    pub events: EventSender,
    pub terminated: Rc<Cell<bool>>,
}

#[derive(Default)]
pub struct FakeTransport {
    pub opened: Vec<OpenedConnection>,
    /// When set, the next `open` fails synchronously with this error
    pub fail_next: Option<ConnectError>,
}

impl FakeTransport {
    pub fn last(&self) -> &OpenedConnection {
        self.opened.last().expect("no connection opened")
    }
}

struct FakeHandle {
    terminated: Rc<Cell<bool>>,
}

impl TransportHandle for FakeHandle {
    fn terminate(&mut self) {
        self.terminated.set(true);
    }
}

impl Transport for FakeTransport {
    fn open(
        &mut self,
        endpoint: &str,
        events: EventSender,
    ) -> Result<Box<dyn TransportHandle>, ConnectError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }

        let terminated = Rc::new(Cell::new(false));
        self.opened.push(OpenedConnection {
            endpoint: endpoint.to_string(),
            events,
            terminated: Rc::clone(&terminated),
        });
        Ok(Box::new(FakeHandle { terminated }))
    }
}

pub fn session_with(workspace: SingleDocumentWorkspace) -> (FakeSession, EventReceiver) {
    DictationSession::new(
        "ws://localhost:8765",
        FakeTransport::default(),
        workspace,
        StatusLine::new(),
    )
}

pub fn focused_session(text: &str) -> (FakeSession, EventReceiver) {
    session_with(SingleDocumentWorkspace::new(TextBuffer::from_text(text)))
}

/// Feed every queued transport event to the session
pub fn pump(session: &mut FakeSession, events: &mut EventReceiver) {
    while let Ok(event) = events.try_recv() {
        session.handle_event(event);
    }
}

/// Toggle on and deliver the open event
pub fn connect(session: &mut FakeSession, events: &mut EventReceiver) {
    session.toggle();
    session.transport().last().events.open();
    pump(session, events);
}
