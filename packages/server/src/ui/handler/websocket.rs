//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{AvatarUrl, Connection, DisplayName, OutboundFrame, UserId, UserProfile},
    infrastructure::dto::websocket::{ClientEvent, TEXT_MESSAGE_TYPE},
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl ConnectQuery {
    fn into_profile(self) -> Result<UserProfile, crate::domain::ValueObjectError> {
        let user_id = UserId::new(self.user_id)?;
        let name = DisplayName::or_user_id(self.name, &user_id)?;
        Ok(UserProfile::new(user_id, name, AvatarUrl::new(self.avatar)))
    }
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let raw_user_id = query.user_id.clone();

    // Convert query -> UserProfile (Domain Model)
    let profile = match query.into_profile() {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Rejecting connection for '{}': {}", raw_user_id, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // Registration happens once the upgrade has succeeded, so a failed
    // handshake never leaves a user online.
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, profile)))
}

/// Spawns the connection's only writer.
///
/// Drains the connection's channel in order and stops on a `Close` frame
/// (the connection was replaced) or when the socket refuses a write.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                OutboundFrame::Text(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                OutboundFrame::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, profile: UserProfile) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive notifications
    let (tx, rx) = mpsc::unbounded_channel();

    // The presence snapshot and the joined broadcast are queued here; the
    // writer below delivers them before anything else.
    let connection = state.connect_user_usecase.execute(profile, tx).await;
    tracing::info!(
        "'{}' connected as {}",
        connection.user_id(),
        connection.id
    );

    let state_clone = state.clone();
    let connection_clone = connection.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error from '{}': {}", connection_clone.user_id(), e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_clone.user_id(), text);
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => dispatch(&state_clone, &connection_clone, event).await,
                        Err(e) => {
                            tracing::warn!(
                                "Ignoring unparseable frame from '{}': {}",
                                connection_clone.user_id(),
                                e
                            );
                        }
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("'{}' requested close", connection_clone.user_id());
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to deliver queued notifications to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Also covers a writer that failed on its very first frame: the
    // registration is rolled back here.
    if state.disconnect_user_usecase.execute(&connection).await {
        tracing::info!("'{}' disconnected", connection.user_id());
    } else {
        tracing::info!(
            "Connection {} of '{}' closed after being replaced",
            connection.id,
            connection.user_id()
        );
    }
}

/// Route one client event to its use case. Failures are logged; the socket
/// stays open.
async fn dispatch(state: &AppState, connection: &Connection, event: ClientEvent) {
    match event {
        ClientEvent::JoinRoom(payload) => {
            if let Err(e) = state
                .join_room_usecase
                .join(connection, &payload.room_id)
                .await
            {
                tracing::warn!("join-room from '{}' rejected: {}", connection.user_id(), e);
            }
        }
        ClientEvent::LeaveRoom => {
            state.join_room_usecase.leave(connection).await;
        }
        ClientEvent::SendMessage(payload) => {
            if payload.message_type != TEXT_MESSAGE_TYPE {
                tracing::warn!(
                    "Unsupported message type '{}' from '{}'",
                    payload.message_type,
                    connection.user_id()
                );
                return;
            }
            if let Err(e) = state
                .send_message_usecase
                .execute(
                    connection,
                    &payload.room_id,
                    payload.message,
                    payload.client_message_id,
                )
                .await
            {
                tracing::warn!("send-message from '{}' rejected: {}", connection.user_id(), e);
            }
        }
        ClientEvent::TypingStart(payload) => {
            relay_typing(state, connection, &payload.room_id, true).await;
        }
        ClientEvent::TypingStop(payload) => {
            relay_typing(state, connection, &payload.room_id, false).await;
        }
        ClientEvent::MarkAsRead(payload) => {
            if let Err(e) = state
                .unread_counts_usecase
                .mark_as_read(connection, &payload.sender_id, &payload.recipient_id)
                .await
            {
                tracing::warn!("mark-as-read from '{}' rejected: {}", connection.user_id(), e);
            }
        }
        ClientEvent::RequestInitialUnreadCounts => {
            let counters = state.unread_counts_usecase.initial_counts(connection).await;
            tracing::debug!(
                "Sent {} unread counters to '{}'",
                counters.len(),
                connection.user_id()
            );
        }
    }
}

async fn relay_typing(state: &AppState, connection: &Connection, room_id: &str, is_typing: bool) {
    if let Err(e) = state
        .relay_typing_usecase
        .execute(connection, room_id, is_typing)
        .await
    {
        tracing::warn!("Typing signal from '{}' rejected: {}", connection.user_id(), e);
    }
}
