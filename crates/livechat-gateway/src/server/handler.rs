//! WebSocket router
//!
//! The per-connection receive loop: decode each inbound payload, dispatch it
//! to the single matching handler, and isolate every per-frame fault so the
//! connection only ends when the transport does.

use crate::connection::Session;
use crate::protocol;
use crate::server::GatewayState;
use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Channel buffer size for outgoing frames
const MESSAGE_BUFFER_SIZE: usize = 100;

/// WebSocket upgrade handler
pub async fn ws_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: axum::extract::ws::WebSocket) {
    let (tx, mut rx) = mpsc::channel::<String>(MESSAGE_BUFFER_SIZE);
    let session = Session::new(livechat_core::SessionId::generate(), tx);
    let session_id = session.id();

    state.registry().add_session(session.clone());

    tracing::info!(%session_id, "WebSocket connection established");

    let (mut ws_sink, ws_stream) = socket.split();

    // Single writer task: drains the session's outbound queue
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if ws_sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
        let _ = ws_sink.close().await;
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut recv_task = tokio::spawn(recv_loop(
        state.clone(),
        session.clone(),
        ws_stream,
        shutdown_rx,
    ));

    // Either side ending tears down the other so no further frames are
    // processed for this session. The receive loop is stopped cooperatively
    // so a frame already being handled runs to completion.
    tokio::select! {
        _ = &mut send_task => {
            let _ = shutdown_tx.send(true);
            let _ = (&mut recv_task).await;
        }
        _ = &mut recv_task => send_task.abort(),
    }

    session.close().await;
    state.registry().remove_session(session_id).await;

    tracing::info!(%session_id, "Connection closed and cleaned up");
}

/// Receive loop: frames from one connection are processed strictly in
/// arrival order.
///
/// The shutdown signal is observed only between frames, so a fan-out that
/// has begun always attempts every member of its snapshot before the loop
/// exits.
async fn recv_loop<S>(
    state: GatewayState,
    session: Arc<Session>,
    mut stream: S,
    mut shutdown: watch::Receiver<bool>,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let session_id = session.id();
    loop {
        let msg = tokio::select! {
            _ = shutdown.changed() => break,
            msg = stream.next() => match msg {
                Some(msg) => msg,
                None => break,
            },
        };

        match msg {
            Ok(Message::Text(text)) => {
                handle_frame(&state, &session, &text).await;
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(%session_id, "Binary payload discarded");
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                tracing::info!(%session_id, "Client closed connection");
                break;
            }
            Err(e) => {
                tracing::warn!(%session_id, error = %e, "WebSocket transport error");
                break;
            }
        }
    }
}

/// Process one inbound text payload
///
/// Every failure here is logged and swallowed: a malformed frame, an unknown
/// destination, or a handler fault never terminates the connection.
async fn handle_frame(state: &GatewayState, session: &Arc<Session>, text: &str) {
    let frame = match protocol::decode(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(
                session_id = %session.id(),
                error = %e,
                "Discarding malformed frame"
            );
            return;
        }
    };

    let handler = match state.handlers().find(&frame.destination) {
        Ok(handler) => handler,
        Err(e) => {
            tracing::warn!(
                session_id = %session.id(),
                destination = %frame.destination,
                error = %e,
                "No handler for frame"
            );
            return;
        }
    };

    if let Err(e) = handler.handle(session, &frame).await {
        tracing::warn!(
            session_id = %session.id(),
            destination = %frame.destination,
            error = %e,
            "Handler failed; connection stays open"
        );
    }
}
