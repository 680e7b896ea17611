use crate::session::{ClientCommand, SessionError, SessionManager};
use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{Mutex, broadcast},
    task::JoinHandle,
    time::Instant,
};
use uuid::Uuid;

const SERVER_HEARTBEAT_INTERVAL_SECONDS: u64 = 30; // How often server sends a Ping
const SERVER_HEARTBEAT_TIMEOUT_SECONDS: u64 = 60; // How long server waits for Pong after its Ping

/// GET /ws/session/:session_id
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(manager): State<Arc<SessionManager>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, SessionError> {
    // fail before upgrading so the client gets a 404 instead of a dead socket
    manager.get_session(&session_id).await?;
    tracing::info!(%session_id, "New WebSocket connection attempt");
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, manager, session_id)))
}

async fn handle_socket(socket: WebSocket, manager: Arc<SessionManager>, session_id: Uuid) {
    let mut events = match manager.get_session(&session_id).await {
        Ok(session) => session.subscribe(),
        Err(e) => {
            tracing::warn!(%session_id, "Session vanished during upgrade: {}", e);
            return;
        }
    };
    tracing::info!(%session_id, "WebSocket connection established");

    let (ws_sender, mut ws_receiver) = socket.split();
    let ws_sender = Arc::new(Mutex::new(ws_sender));
    let last_pong_received = Arc::new(Mutex::new(Instant::now()));

    // --- Task 1: session events -> WebSocket ---
    let events_sender = Arc::clone(&ws_sender);
    let mut recv_task: JoinHandle<()> = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(%session_id, skipped, "WebSocket client lagging behind session events");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(%session_id, "Failed to serialize server event: {}", e);
                    continue;
                }
            };
            tracing::trace!(%session_id, "Sending event to WebSocket: {}", text);
            if events_sender
                .lock()
                .await
                .send(Message::Text(text.into()))
                .await
                .is_err()
            {
                tracing::warn!(%session_id, "Failed to send event, client disconnected?");
                break;
            }
        }
    });

    // --- Task 2: WebSocket -> session commands ---
    let command_manager = Arc::clone(&manager);
    let command_last_pong = Arc::clone(&last_pong_received);
    let mut send_task: JoinHandle<()> = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(command) => {
                        if let Err(e) = command_manager.handle_command(&session_id, command).await {
                            tracing::error!(%session_id, "Failed to handle client command: {}", e);
                            if matches!(e, SessionError::SessionNotFound(_)) {
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(%session_id, "Failed to parse client command: {}. Raw: '{}'", e, text);
                    }
                },
                Ok(Message::Binary(bin)) => {
                    tracing::warn!(%session_id, "Received unexpected binary message ({} bytes)", bin.len());
                }
                Ok(Message::Ping(_)) => {
                    tracing::trace!(%session_id, "Received Ping from client");
                }
                Ok(Message::Pong(_)) => {
                    *command_last_pong.lock().await = Instant::now();
                }
                Ok(Message::Close(close_frame)) => {
                    tracing::info!(%session_id, "Received Close frame: {:?}", close_frame);
                    break;
                }
                Err(e) => {
                    tracing::warn!(%session_id, "WebSocket receive error: {}", e);
                    break;
                }
            }
        }
    });

    // --- Task 3: heartbeat ---
    let heartbeat_sender = Arc::clone(&ws_sender);
    let heartbeat_last_pong = Arc::clone(&last_pong_received);
    let mut heartbeat_task: JoinHandle<&'static str> = tokio::spawn(async move {
        let timeout = Duration::from_secs(SERVER_HEARTBEAT_TIMEOUT_SECONDS);
        let mut interval =
            tokio::time::interval(Duration::from_secs(SERVER_HEARTBEAT_INTERVAL_SECONDS));
        loop {
            interval.tick().await;
            if heartbeat_last_pong.lock().await.elapsed() > timeout {
                return "heartbeat timeout";
            }
            if heartbeat_sender
                .lock()
                .await
                .send(Message::Ping(Vec::new().into()))
                .await
                .is_err()
            {
                return "failed to send ping";
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => {
            send_task.abort();
            heartbeat_task.abort();
        },
        _ = &mut send_task => {
            recv_task.abort();
            heartbeat_task.abort();
        },
        res = &mut heartbeat_task => {
            if let Ok(reason) = res {
                tracing::info!(%session_id, "Heartbeat task stopped: {}", reason);
            }
            recv_task.abort();
            send_task.abort();
        }
    }

    if let Err(e) = ws_sender.lock().await.close().await {
        tracing::debug!(%session_id, "Ignoring error closing WebSocket sender: {}", e);
    }
    // the session itself outlives the socket; idle cleanup reclaims it
    tracing::info!(%session_id, "WebSocket client disconnected");
}
