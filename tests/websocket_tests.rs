// End-to-end tests against a local WebSocket server.

use dictation_bridge::{
    DictationSession, EventReceiver, SessionState, SingleDocumentWorkspace, StatusLine,
    TextBuffer, WebSocketTransport,
};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

type WsSession = DictationSession<WebSocketTransport, SingleDocumentWorkspace, StatusLine>;

fn new_session(endpoint: String) -> (WsSession, EventReceiver) {
    DictationSession::new(
        endpoint,
        WebSocketTransport::new(),
        SingleDocumentWorkspace::new(TextBuffer::new()),
        StatusLine::new(),
    )
}

/// Feed events to the session until `done` holds
async fn pump_until(
    session: &mut WsSession,
    events: &mut EventReceiver,
    done: impl Fn(&WsSession) -> bool,
) {
    timeout(Duration::from_secs(5), async {
        while !done(session) {
            let event = events.recv().await.expect("event channel closed");
            session.handle_event(event);
        }
    })
    .await
    .expect("timed out waiting for session");
}

#[tokio::test]
async fn test_transcriptions_flow_into_document() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();

        ws.send(Message::text(r#"{"text": "hello"}"#)).await.unwrap();
        ws.send(Message::text("not json")).await.unwrap();
        ws.send(Message::binary(br#"{"text": "world", "final": true}"#.to_vec()))
            .await
            .unwrap();

        // Wait for the client to hang up
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
        }
    });

    let (mut session, mut events) = new_session(format!("ws://{}", addr));

    session.toggle();
    assert_eq!(session.state(), SessionState::Connecting);

    pump_until(&mut session, &mut events, |s| s.stats().transcripts_inserted == 2).await;

    assert_eq!(session.state(), SessionState::Connected);
    assert_eq!(session.status().text(), "Connected");
    assert_eq!(session.workspace().document().text(), "hello\nworld\n");
    assert_eq!(session.stats().decode_failures, 1);

    session.toggle();
    assert_eq!(session.state(), SessionState::Idle);

    pump_until(&mut session, &mut events, |s| !s.has_connection()).await;
    assert_eq!(session.status().text(), "Disconnected");

    timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not finish")
        .unwrap();
}

#[tokio::test]
async fn test_server_close_returns_to_idle() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        ws.send(Message::text(r#"{"text": "bye"}"#)).await.unwrap();
        let _ = ws.close(None).await;
    });

    let (mut session, mut events) = new_session(format!("ws://{}", addr));
    session.toggle();

    pump_until(&mut session, &mut events, |s| {
        s.state() == SessionState::Idle && !s.has_connection()
    })
    .await;

    assert_eq!(session.workspace().document().text(), "bye\n");
    assert_eq!(session.status().text(), "Disconnected");
}

#[tokio::test]
async fn test_unreachable_server_fails() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (mut session, mut events) = new_session(format!("ws://{}", addr));
    session.toggle();

    pump_until(&mut session, &mut events, |s| s.state() == SessionState::Failed).await;

    assert_eq!(session.status().text(), "failed to connect");
    assert!(!session.has_connection());
}

#[tokio::test]
async fn test_malformed_endpoint_fails_synchronously() {
    let (mut session, _events) = new_session("localhost:8765".to_string());

    session.toggle();

    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(session.status().text(), "failed to connect");
}

#[tokio::test]
async fn test_shutdown_while_connected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    });

    let (mut session, mut events) = new_session(format!("ws://{}", addr));
    session.toggle();
    pump_until(&mut session, &mut events, |s| s.state() == SessionState::Connected).await;

    session.shutdown();
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.status().text(), "Disconnected");

    // The close event still arrives but is ignored
    let event = timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("no close event")
        .expect("event channel closed");
    session.handle_event(event);
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.status().text(), "Disconnected");
}
