use super::{EventSender, Frame, Transport, TransportHandle};
use crate::error::{ConnectError, TransportError};
use futures::stream::StreamExt;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::connect_async;
use tracing::{debug, info, warn};

/// WebSocket transport driven by the ambient tokio runtime
#[derive(Debug, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for WebSocketTransport {
    fn open(
        &mut self,
        endpoint: &str,
        events: EventSender,
    ) -> Result<Box<dyn TransportHandle>, ConnectError> {
        let request = client_request(endpoint)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ConnectError::NoRuntime)?;

        info!(
            "Connecting to dictation server at {} (connection {})",
            endpoint,
            events.connection()
        );

        let (stop_tx, stop_rx) = oneshot::channel();
        runtime.spawn(run_connection(request, events, stop_rx));

        Ok(Box::new(WebSocketHandle {
            stop: Some(stop_tx),
        }))
    }
}

/// Terminating (or dropping) the handle stops the connection task
struct WebSocketHandle {
    stop: Option<oneshot::Sender<()>>,
}

impl TransportHandle for WebSocketHandle {
    fn terminate(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

/// Validate `endpoint` and turn it into a handshake request
pub fn client_request(endpoint: &str) -> Result<Request, ConnectError> {
    let request = endpoint
        .into_client_request()
        .map_err(|e| ConnectError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

    match request.uri().scheme_str() {
        Some("ws") | Some("wss") => {}
        other => {
            return Err(ConnectError::UnsupportedScheme {
                endpoint: endpoint.to_string(),
                scheme: other.unwrap_or_default().to_string(),
            })
        }
    }

    if request.uri().host().is_none() {
        return Err(ConnectError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(request)
}

async fn run_connection(
    request: Request,
    events: EventSender,
    mut stop: oneshot::Receiver<()>,
) {
    let connection = events.connection();

    let mut stream = tokio::select! {
        result = connect_async(request) => match result {
            Ok((stream, _response)) => stream,
            Err(e) => {
                warn!("Connection {} failed: {}", connection, e);
                events.error(TransportError::new(e.to_string()));
                events.close();
                return;
            }
        },
        _ = &mut stop => {
            debug!("Connection {} cancelled before it opened", connection);
            events.close();
            return;
        }
    };

    info!("Connection {} open", connection);
    events.open();

    loop {
        tokio::select! {
            _ = &mut stop => {
                debug!("Terminating connection {}", connection);
                if let Err(e) = stream.close(None).await {
                    debug!("Close frame not sent on connection {}: {}", connection, e);
                }
                break;
            }
            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => events.message(Frame::Text(text.as_str().to_owned())),
                Some(Ok(Message::Binary(data))) => events.message(Frame::Binary(data.to_vec())),
                Some(Ok(Message::Close(_))) | None => {
                    debug!("Server closed connection {}", connection);
                    break;
                }
                // Ping/pong are answered by tungstenite itself
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Connection {} error: {}", connection, e);
                    events.error(TransportError::new(e.to_string()));
                    break;
                }
            }
        }
    }

    info!("Connection {} closed", connection);
    events.close();
}
