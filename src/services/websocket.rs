use std::sync::Arc;

use axum::{
    extract::{
        Extension, Path,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::error;

use crate::dto::draft_dto::{TimerUpdate, UpdateDraft};
use crate::dto::log_dto::{LogEntry, UpdateLog};
use crate::engine::state::DraftState;
use crate::services::hub::{DraftRoom, SharedHub};

pub fn send_draft_update(tx: &broadcast::Sender<String>, state: &DraftState) {
    let update = UpdateDraft {
        r#type: "draft_update".to_string(),
        draft_state: state.clone(),
    };
    match serde_json::to_string(&update) {
        Ok(json) => {
            let _ = tx.send(json);
        }
        Err(e) => {
            error!("Failed to serialize draft update message: {}", e);
        }
    }
}

pub fn send_log_append(tx: &broadcast::Sender<String>, entry: &LogEntry) {
    let update = UpdateLog {
        r#type: "log_append".to_string(),
        entry: entry.clone(),
    };
    match serde_json::to_string(&update) {
        Ok(json) => {
            let _ = tx.send(json);
        }
        Err(e) => {
            error!("Failed to serialize log append message: {}", e);
        }
    }
}

pub fn send_timer_update(tx: &broadcast::Sender<String>, remaining_seconds: u64) {
    let update = TimerUpdate {
        r#type: "timer_update".to_string(),
        remaining_seconds,
    };
    match serde_json::to_string(&update) {
        Ok(json) => {
            let _ = tx.send(json);
        }
        Err(e) => {
            error!("Failed to serialize timer update message: {}", e);
        }
    }
}

/* Web Socket stuff */
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(id): Path<String>,
    Extension(hub): Extension<SharedHub>,
) -> Response {
    match hub.get(&id).await {
        Some(room) => ws
            .on_upgrade(move |socket| handle_socket(socket, room))
            .into_response(),
        None => (StatusCode::NOT_FOUND, format!("No draft with id {id}")).into_response(),
    }
}

async fn handle_socket(socket: WebSocket, room: Arc<DraftRoom>) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = room.tx.subscribe();

    // Snapshot first, so a late joiner isn't blank until the next commit.
    {
        let state = room.state.read().await;
        let snapshot = UpdateDraft {
            r#type: "draft_update".to_string(),
            draft_state: state.clone(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(json) => {
                if sender.send(Message::Text(json.into())).await.is_err() {
                    return;
                }
            }
            Err(e) => {
                error!("Failed to serialize draft snapshot: {}", e);
                return;
            }
        }
    }

    // Task to send every committed update to this client
    let send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // Subscribers are read-only observers; drain frames until the peer leaves.
    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Close(_) = msg {
            break;
        }
    }

    // Clean up
    send_task.abort();
}
