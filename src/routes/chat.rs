use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures_util::{SinkExt, StreamExt};

use crate::{
    dto::chat::{ClientEvent, ServerEvent},
    services::chat_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(chat_ws))
}

pub async fn chat_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Replay the full history to the new client before streaming updates.
    match chat_service::message_log(&state).await {
        Ok(log) => match serde_json::to_string(&ServerEvent::MessageLog(log)) {
            Ok(event) => {
                if sender.send(Message::Text(event.into())).await.is_err() {
                    return;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize message log");
                return;
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "failed to load message log");
            return;
        }
    }

    let mut rx = state.chat_tx.subscribe();
    let mut send_task = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            if sender.send(Message::Text(event.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            let Message::Text(text) = message else {
                continue;
            };
            match serde_json::from_str::<ClientEvent>(&text) {
                Ok(ClientEvent::Message(incoming)) => {
                    if let Err(err) =
                        chat_service::append_and_broadcast(&recv_state, incoming).await
                    {
                        tracing::warn!(error = %err, "failed to append chat message");
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring malformed chat event");
                }
            }
        }
    });

    // Whichever side finishes first tears down the other.
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}
