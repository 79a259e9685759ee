//! Fixtures shared by the use case tests.

use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Notify, mpsc};

use crate::{
    domain::{
        AvatarUrl, Connection, ConnectionId, DisplayName, MessagePushError, MessagePusher,
        Notification, OutboundFrame, Timestamp, UserDirectory, UserId, UserProfile,
    },
    infrastructure::{
        dto::websocket::ServerEvent, message_pusher::WebSocketMessagePusher,
        repository::InMemoryUserDirectory,
    },
};

pub fn user(id: &str) -> UserId {
    UserId::new(id.to_string()).unwrap()
}

pub fn profile(id: &str) -> UserProfile {
    let user_id = user(id);
    UserProfile::new(
        user_id.clone(),
        DisplayName::or_user_id(None, &user_id).unwrap(),
        AvatarUrl::default(),
    )
}

pub fn connection(id: &str, connection_id: u64) -> (Connection, mpsc::UnboundedReceiver<OutboundFrame>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        Connection::new(
            ConnectionId::new(connection_id),
            profile(id),
            Timestamp::new(0),
            tx,
        ),
        rx,
    )
}

/// Every event queued so far, decoded
pub fn drain_events(rx: &mut mpsc::UnboundedReceiver<OutboundFrame>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        if let OutboundFrame::Text(json) = frame {
            events.push(serde_json::from_str(&json).unwrap());
        }
    }
    events
}

/// The presence set a client shows after applying `events` in order
pub fn believed_online(events: &[ServerEvent]) -> Vec<String> {
    let mut online = BTreeSet::new();
    for event in events {
        if let ServerEvent::OnlineUsersUpdated(payload) = event {
            if let Some(users) = &payload.users {
                online = users.iter().cloned().collect();
            }
            for id in payload.added.iter().flatten() {
                online.insert(id.clone());
            }
            for id in payload.removed.iter().flatten() {
                online.remove(id);
            }
        }
    }
    online.into_iter().collect()
}

/// Holds one task at a known point until the test releases it.
#[derive(Default)]
pub struct Stall {
    entered: Notify,
    released: Notify,
}

impl Stall {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn hold(&self) {
        self.entered.notify_one();
        self.released.notified().await;
    }

    /// Wait until a task is being held.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }
}

/// Pusher that holds notifications matching `stall_on` before queueing them
pub struct StallingPusher {
    inner: WebSocketMessagePusher,
    stall: Arc<Stall>,
    stall_on: fn(&Notification) -> bool,
}

impl StallingPusher {
    pub fn new(stall: Arc<Stall>, stall_on: fn(&Notification) -> bool) -> Self {
        Self {
            inner: WebSocketMessagePusher::new(),
            stall,
            stall_on,
        }
    }
}

#[async_trait]
impl MessagePusher for StallingPusher {
    async fn push_to(
        &self,
        connection: &Connection,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        if (self.stall_on)(notification) {
            self.stall.hold().await;
        }
        self.inner.push_to(connection, notification).await
    }

    async fn broadcast(&self, targets: &[Connection], notification: &Notification) -> Vec<UserId> {
        if (self.stall_on)(notification) {
            self.stall.hold().await;
        }
        self.inner.broadcast(targets, notification).await
    }

    async fn close(&self, connection: &Connection) {
        self.inner.close(connection).await
    }
}

/// Directory whose `upsert` is held by a [`Stall`]
pub struct StallingDirectory {
    inner: InMemoryUserDirectory,
    stall: Arc<Stall>,
}

impl StallingDirectory {
    pub fn new(stall: Arc<Stall>) -> Self {
        Self {
            inner: InMemoryUserDirectory::new(),
            stall,
        }
    }
}

#[async_trait]
impl UserDirectory for StallingDirectory {
    async fn upsert(&self, profile: UserProfile) {
        self.stall.hold().await;
        self.inner.upsert(profile).await
    }

    async fn list(&self) -> Vec<UserProfile> {
        self.inner.list().await
    }
}
