//! WebSocket client session management.
//!
//! One session is one connection. It runs a single event loop over the
//! socket, the submitted lines, the typing signals, and the roster fetch, so
//! the session state needs no locking.

use futures_util::{Sink, SinkExt, StreamExt};
use hanashi_server::infrastructure::dto::{
    http::UserSummaryDto,
    websocket::{
        ClientEvent, JoinRoomPayload, MarkAsReadPayload, OnlineUsersPayload, SendMessagePayload,
        ServerEvent, TEXT_MESSAGE_TYPE, TypingPayload,
    },
};
use tokio::{sync::mpsc, time::Instant};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{
    domain::room_id_between,
    error::ClientError,
    roster::{RosterReconciler, RosterRow},
    runner::ClientConfig,
    typing::{TYPING_WINDOW, TypingDebouncer, TypingSignal, TypingTracker},
};

use super::{formatter::MessageFormatter, roster_api::fetch_roster, ui::redisplay_prompt};

/// Process-wide inputs that outlive a single connection
pub struct SessionInputs {
    pub lines: mpsc::UnboundedReceiver<String>,
    pub typing_signals: mpsc::UnboundedReceiver<TypingSignal>,
    pub debouncer: TypingDebouncer,
    /// Conversation to reopen after a reconnect
    pub open_peer: Option<String>,
}

/// The open conversation
struct OpenRoom {
    peer: String,
    room_id: String,
}

/// What the session knows, rebuilt on every connection
struct SessionState {
    me: String,
    roster: RosterReconciler,
    typing: TypingTracker,
    open: Option<OpenRoom>,
}

impl SessionState {
    fn new(me: &str) -> Self {
        Self {
            me: me.to_string(),
            roster: RosterReconciler::new(me),
            typing: TypingTracker::new(TYPING_WINDOW),
            open: None,
        }
    }

    fn is_open(&self, room_id: &str) -> bool {
        self.open.as_ref().is_some_and(|open| open.room_id == room_id)
    }

    fn render_roster(&mut self) -> String {
        let now = Instant::now();
        self.typing.prune(now);
        let typing = match &self.open {
            Some(open) => self.typing.typing_in(&open.room_id, now),
            None => Vec::new(),
        };
        let rows: Vec<&RosterRow> = self.roster.rows().collect();
        MessageFormatter::format_roster(&rows, &typing)
    }
}

fn connect_url(config: &ClientConfig) -> Result<String, ClientError> {
    let mut url = reqwest::Url::parse(&config.url)
        .map_err(|e| ClientError::ConnectionError(format!("invalid url '{}': {}", config.url, e)))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("user_id", &config.user_id);
        if let Some(name) = &config.name {
            query.append_pair("name", name);
        }
        if let Some(avatar) = &config.avatar {
            query.append_pair("avatar", avatar);
        }
    }
    Ok(url.to_string())
}

/// Run one WebSocket client session.
///
/// Returns `Ok(())` when the user quits and an error when the connection
/// could not be opened or was lost.
pub async fn run_client_session(
    config: &ClientConfig,
    inputs: &mut SessionInputs,
) -> Result<(), ClientError> {
    let url = connect_url(config)?;

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        // The server answers an unusable profile with 400
        Err(tungstenite::Error::Http(response)) if response.status().is_client_error() => {
            return Err(ClientError::Rejected(config.user_id.clone()));
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}'. Type /help for commands. Press Ctrl+C to exit.\n",
        config.user_id
    );

    let (mut write, mut read) = ws_stream.split();
    let me = config.user_id.as_str();
    let mut state = SessionState::new(me);

    // Counters first: they may well arrive before the roster, which is the
    // case the roster reconciler buffers for.
    send_event(&mut write, &ClientEvent::RequestInitialUnreadCounts).await?;

    let (roster_tx, mut roster_rx) = mpsc::channel(1);
    spawn_roster_fetch(&config.api_url, &roster_tx);
    let mut roster_pending = true;

    inputs.debouncer.set_room(None);
    if let Some(peer) = inputs.open_peer.clone() {
        open_conversation(&mut write, &mut state, inputs, &peer).await?;
    }

    loop {
        tokio::select! {
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(event) => {
                            // Someone we have never listed came online.
                            if handle_server_event(&mut state, event) && !roster_pending {
                                spawn_roster_fetch(&config.api_url, &roster_tx);
                                roster_pending = true;
                            }
                        }
                        Err(e) => tracing::warn!("Ignoring unknown server frame: {}", e),
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionLost("closed by server".to_string()));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionLost(e.to_string()));
                }
                None => {
                    return Err(ClientError::ConnectionLost("stream ended".to_string()));
                }
            },
            line = inputs.lines.recv() => match line {
                Some(line) => {
                    if handle_line(&mut write, &mut state, inputs, &line).await? {
                        let _ = write.send(Message::Close(None)).await;
                        return Ok(());
                    }
                }
                None => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }
            },
            Some(signal) = inputs.typing_signals.recv() => {
                let event = match signal {
                    TypingSignal::Start { room_id } => ClientEvent::TypingStart(TypingPayload { room_id }),
                    TypingSignal::Stop { room_id } => ClientEvent::TypingStop(TypingPayload { room_id }),
                };
                send_event(&mut write, &event).await?;
            },
            Some(result) = roster_rx.recv(), if roster_pending => {
                roster_pending = false;
                match result {
                    Ok(users) => {
                        state.roster.load_roster(users);
                        print!("{}", state.render_roster());
                        redisplay_prompt(me);
                    }
                    Err(e) => tracing::warn!("{}", e),
                }
            },
        }
    }
}

type RosterResult = Result<Vec<UserSummaryDto>, ClientError>;

fn spawn_roster_fetch(api_url: &str, tx: &mpsc::Sender<RosterResult>) {
    let api_url = api_url.to_string();
    let tx = tx.clone();
    tokio::spawn(async move {
        let _ = tx.send(fetch_roster(&api_url).await).await;
    });
}

async fn send_event<S>(write: &mut S, event: &ClientEvent) -> Result<(), ClientError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let json = serde_json::to_string(event)
        .map_err(|e| ClientError::ConnectionError(format!("failed to encode event: {}", e)))?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionLost(e.to_string()))
}

/// Apply one server event to the session state and print it.
///
/// Returns `true` when presence named a user missing from the roster.
fn handle_server_event(state: &mut SessionState, event: ServerEvent) -> bool {
    let me = state.me.clone();
    match event {
        ServerEvent::NewMessage(message) => {
            if state.is_open(&message.room_id) {
                if message.sender_id != me {
                    state.typing.apply(&message.room_id, &message.sender_id, false, Instant::now());
                }
                print!("{}", MessageFormatter::format_new_message(&message, &me));
                redisplay_prompt(&me);
            }
            false
        }
        ServerEvent::MessageAck(ack) => {
            let peer = state.open.as_ref().map(|open| open.peer.as_str()).unwrap_or("the recipient");
            if let Some(note) = MessageFormatter::format_ack(&ack, peer) {
                print!("{}", note);
                redisplay_prompt(&me);
            }
            false
        }
        ServerEvent::UserTyping(typing) => {
            state
                .typing
                .apply(&typing.room_id, &typing.user_id, typing.is_typing, Instant::now());
            if state.is_open(&typing.room_id) {
                print!(
                    "{}",
                    MessageFormatter::format_typing(&typing.user_id, typing.is_typing)
                );
                redisplay_prompt(&me);
            }
            false
        }
        ServerEvent::OnlineUsersUpdated(presence) => {
            state.roster.apply_presence(&presence);
            let unknown_online = state.roster.pending_count() > 0;
            let OnlineUsersPayload { added, removed, .. } = presence;
            let added: Vec<String> = added.into_iter().flatten().filter(|u| *u != me).collect();
            let removed: Vec<String> = removed.into_iter().flatten().collect();
            if !added.is_empty() || !removed.is_empty() {
                print!("{}", MessageFormatter::format_presence(&added, &removed));
                redisplay_prompt(&me);
            }
            unknown_online
        }
        ServerEvent::UnreadCountUpdated(unread) => {
            state.roster.apply_unread(&unread.sender_id, unread.unread_count);
            if unread.unread_count > 0 {
                print!(
                    "{}",
                    MessageFormatter::format_unread(&unread.sender_id, unread.unread_count)
                );
                redisplay_prompt(&me);
            }
            false
        }
    }
}

async fn open_conversation<S>(
    write: &mut S,
    state: &mut SessionState,
    inputs: &mut SessionInputs,
    peer: &str,
) -> Result<(), ClientError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let room_id = room_id_between(&state.me, peer);
    send_event(
        write,
        &ClientEvent::JoinRoom(JoinRoomPayload {
            room_id: room_id.clone(),
        }),
    )
    .await?;
    // Opening the conversation reads it.
    send_event(
        write,
        &ClientEvent::MarkAsRead(MarkAsReadPayload {
            sender_id: peer.to_string(),
            recipient_id: state.me.clone(),
        }),
    )
    .await?;

    inputs.debouncer.set_room(Some(room_id.clone()));
    inputs.open_peer = Some(peer.to_string());
    print!("{}", MessageFormatter::format_opened(peer, &room_id));
    state.open = Some(OpenRoom {
        peer: peer.to_string(),
        room_id,
    });
    Ok(())
}

/// Handle one submitted line. Returns `true` when the user asked to quit.
async fn handle_line<S>(
    write: &mut S,
    state: &mut SessionState,
    inputs: &mut SessionInputs,
    line: &str,
) -> Result<bool, ClientError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let me = state.me.clone();
    let mut words = line.split_whitespace();
    match words.next() {
        Some("/quit") => return Ok(true),
        Some("/help") => print!("{}", MessageFormatter::format_help()),
        Some("/who") => print!("{}", state.render_roster()),
        Some("/open") => match words.next() {
            Some(peer) if peer != me => {
                open_conversation(write, state, inputs, peer).await?;
            }
            _ => println!("\nusage: /open <user> (someone other than yourself)"),
        },
        Some("/close") => {
            if let Some(open) = state.open.take() {
                send_event(write, &ClientEvent::LeaveRoom).await?;
                state.typing.clear_room(&open.room_id);
                inputs.debouncer.set_room(None);
                inputs.open_peer = None;
                println!("\n--- closed conversation with {} ---", open.peer);
            }
        }
        Some(command) if command.starts_with('/') => {
            println!("\nunknown command {}; try /help", command);
        }
        _ => match &state.open {
            Some(open) => {
                let event = ClientEvent::SendMessage(SendMessagePayload {
                    room_id: open.room_id.clone(),
                    message: line.to_string(),
                    message_type: TEXT_MESSAGE_TYPE.to_string(),
                    client_message_id: Some(uuid::Uuid::new_v4().to_string()),
                });
                send_event(write, &event).await?;
                // The draft was submitted, so the input is empty again.
                inputs.debouncer.draft_changed("");
            }
            None => println!("\nopen a conversation first: /open <user>"),
        },
    }
    redisplay_prompt(&me);
    Ok(false)
}
