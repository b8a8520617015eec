use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{to_json, AppState};
use crate::pipeline::Pipeline;
use crate::wire::{ClientMessage, ErrorReply};

const OUTBOUND_BUFFER: usize = 32;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let tasks = state.tasks.clone();
    ws.on_upgrade(move |socket| tasks.track_future(handle_socket(socket, state)))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let id = Uuid::new_v4();
    let connected_at = Utc::now();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);

    state.sessions.register(id, tx.clone()).await;
    info!(%id, "session connected");

    // Replies and broadcasts share one queue so a session sees them in order.
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
        let _ = sink.send(Message::Close(None)).await;
    });

    let mut shutdown = state.shutdown.subscribe();
    loop {
        let frame = tokio::select! {
            frame = stream.next() => frame,
            _ = shutdown.changed() => break,
        };
        let reply = match frame {
            Some(Ok(Message::Text(text))) => reply_to(&state.pipeline, &text).await,
            Some(Ok(Message::Binary(_))) => {
                to_json(&ErrorReply::new("Unsupported message type: binary"))
            }
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!(%id, "receive failed: {e}");
                break;
            }
        };
        if tx.send(reply).await.is_err() {
            break;
        }
    }

    state.sessions.unregister(&id).await;
    drop(tx);
    let _ = writer.await;
    let secs = (Utc::now() - connected_at).num_seconds();
    info!(%id, secs, "session closed");
}

/// Handle one inbound text frame. Input problems are answered with an
/// `{error}` reply and never reach the pipeline.
pub async fn reply_to(pipeline: &Pipeline, text: &str) -> String {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => return to_json(&ErrorReply::new(format!("Invalid message: {e}"))),
    };
    if !msg.is_supported() {
        let kind = msg.kind.as_deref().unwrap_or_default();
        return to_json(&ErrorReply::new(format!("Unsupported message type: {kind}")));
    }
    let prompt = msg.prompt();
    if prompt.is_empty() {
        return to_json(&ErrorReply::new("Prompt is empty"));
    }

    debug!(model = ?msg.model, edit = msg.components.is_some(), "received prompt");
    let result = pipeline
        .generate(prompt, msg.components.as_deref(), msg.model.as_deref())
        .await;
    to_json(&result)
}
