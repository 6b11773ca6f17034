//! WebSocket chat endpoint.
//!
//! Authenticated via a `token` query parameter. Inbound frames are
//! `{"type": "message", "content": ...}` and
//! `{"type": "typing", "is_typing": ...}`; everything broadcast to a
//! conversation goes through the shared [`crate::registry::ConnectionRegistry`].

use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;

/// Close codes mirroring the HTTP error taxonomy.
const CLOSE_INVALID_TOKEN: u16 = 4001;
const CLOSE_NOT_FOUND: u16 = 4004;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum InboundFrame {
    Message { content: String },
    Typing { is_typing: bool },
}

pub async fn ws_chat(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    // Authenticate and authorize before entering the socket loop; failures
    // are reported through close codes after the upgrade completes.
    let user = match state.auth_service.authenticate(&query.token).await {
        Ok(user) => user,
        Err(err) => {
            tracing::debug!(%err, "websocket token rejected");
            return ws.on_upgrade(|socket| close_with(socket, CLOSE_INVALID_TOKEN, "Invalid token"));
        },
    };

    if state.chat_service.get_conversation(conversation_id, user.id).await.is_err() {
        return ws
            .on_upgrade(|socket| close_with(socket, CLOSE_NOT_FOUND, "Conversation not found"));
    }

    let user_id = user.id;
    ws.on_upgrade(move |socket| handle_socket(state, socket, conversation_id, user_id))
}

async fn close_with(mut socket: WebSocket, code: u16, reason: &'static str) {
    let frame = CloseFrame { code, reason: reason.into() };
    if let Err(err) = socket.send(WsMessage::Close(Some(frame))).await {
        tracing::debug!(%err, "failed to send websocket close frame");
    }
}

async fn handle_socket(
    state: Arc<AppState>,
    socket: WebSocket,
    conversation_id: Uuid,
    user_id: Uuid,
) {
    let (mut sink, mut stream) = socket.split();
    let (connection, mut outbound) = state.registry.join(conversation_id).await;

    // Pump frames broadcast to this conversation out through the socket.
    let send_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if sink.send(WsMessage::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        let text = match message {
            WsMessage::Text(text) => text,
            WsMessage::Close(_) => break,
            _ => continue,
        };

        let frame: InboundFrame = match serde_json::from_str(text.as_str()) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::debug!(%err, "unparseable websocket frame");
                continue;
            },
        };

        match frame {
            InboundFrame::Typing { is_typing } => {
                state
                    .registry
                    .broadcast(
                        conversation_id,
                        &serde_json::json!({"type": "typing", "is_typing": is_typing}),
                    )
                    .await;
            },
            InboundFrame::Message { content } => {
                if content.is_empty() {
                    continue;
                }
                if state.rate_limiter.check(user_id).is_err() {
                    tracing::debug!(%user_id, "websocket message rate limited");
                    state
                        .registry
                        .broadcast(
                            conversation_id,
                            &serde_json::json!({
                                "type": "error",
                                "code": "RATE_LIMITED",
                                "message": "Rate limit exceeded",
                            }),
                        )
                        .await;
                    continue;
                }

                state
                    .registry
                    .broadcast(
                        conversation_id,
                        &serde_json::json!({"type": "typing", "is_typing": true}),
                    )
                    .await;

                let outcome = state
                    .chat_service
                    .send_message(conversation_id, user_id, &content, Vec::new())
                    .await;

                state
                    .registry
                    .broadcast(
                        conversation_id,
                        &serde_json::json!({"type": "typing", "is_typing": false}),
                    )
                    .await;

                match outcome {
                    Ok(outcome) => {
                        state
                            .registry
                            .broadcast(
                                conversation_id,
                                &serde_json::json!({
                                    "type": "message",
                                    "user_message": outcome.user_message,
                                    "assistant_message": outcome.assistant_message,
                                    "session_update": outcome.session_update,
                                }),
                            )
                            .await;
                    },
                    Err(err) => {
                        tracing::warn!(%err, %conversation_id, "websocket message failed");
                    },
                }
            },
        }
    }

    state.registry.leave(conversation_id, connection).await;
    send_task.abort();
}
