//! In-memory channel registry.
//!
//! Connections and the room-view index live behind a single mutex, so a
//! registration, its presence snapshot, and its broadcast targets are all
//! taken from the same state. Callers get cloned handles and push after the
//! lock is released.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChannelRegistry, Connection, ConnectionId, Registration, RoomId, UserId};

#[derive(Default)]
struct RegistryState {
    /// At most one connection per user; last connection wins
    connections: HashMap<UserId, Connection>,
    /// Room each user's current connection is viewing
    viewing: HashMap<UserId, RoomId>,
}

impl RegistryState {
    fn is_current(&self, user_id: &UserId, connection_id: ConnectionId) -> bool {
        self.connections
            .get(user_id)
            .is_some_and(|c| c.id == connection_id)
    }

    fn sorted_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.connections.keys().cloned().collect();
        users.sort();
        users
    }
}

#[derive(Default)]
pub struct InMemoryChannelRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn is_viewing(&self, user_id: &UserId, room_id: &RoomId) -> bool {
        self.state.lock().await.viewing.get(user_id) == Some(room_id)
    }
}

#[async_trait]
impl ChannelRegistry for InMemoryChannelRegistry {
    async fn register(&self, connection: Connection) -> Registration {
        let mut state = self.state.lock().await;
        let user_id = connection.user_id().clone();

        // The old connection's room view does not carry over.
        state.viewing.remove(&user_id);
        let replaced = state.connections.insert(user_id.clone(), connection);

        let others = state
            .connections
            .values()
            .filter(|c| c.user_id() != &user_id)
            .cloned()
            .collect();

        tracing::debug!(
            "Registered '{}' ({} online)",
            user_id,
            state.connections.len()
        );

        Registration {
            replaced,
            online_users: state.sorted_users(),
            others,
        }
    }

    async fn unregister(
        &self,
        user_id: &UserId,
        connection_id: ConnectionId,
    ) -> Option<Vec<Connection>> {
        let mut state = self.state.lock().await;
        if !state.is_current(user_id, connection_id) {
            return None;
        }
        state.connections.remove(user_id);
        state.viewing.remove(user_id);

        tracing::debug!(
            "Unregistered '{}' ({} online)",
            user_id,
            state.connections.len()
        );

        Some(state.connections.values().cloned().collect())
    }

    async fn lookup(&self, user_id: &UserId) -> Option<Connection> {
        self.state.lock().await.connections.get(user_id).cloned()
    }

    async fn online_users(&self) -> Vec<UserId> {
        self.state.lock().await.sorted_users()
    }

    async fn join_room(
        &self,
        user_id: &UserId,
        connection_id: ConnectionId,
        room_id: RoomId,
    ) -> bool {
        let mut state = self.state.lock().await;
        if !state.is_current(user_id, connection_id) {
            return false;
        }
        state.viewing.insert(user_id.clone(), room_id);
        true
    }

    async fn leave_room(&self, user_id: &UserId, connection_id: ConnectionId) -> Option<RoomId> {
        let mut state = self.state.lock().await;
        if !state.is_current(user_id, connection_id) {
            return None;
        }
        state.viewing.remove(user_id)
    }

    async fn room_members(&self, room_id: &RoomId) -> Vec<Connection> {
        let state = self.state.lock().await;
        let (low, high) = room_id.participants();
        [low, high]
            .into_iter()
            .filter(|user_id| state.viewing.get(*user_id) == Some(room_id))
            .filter_map(|user_id| state.connections.get(user_id).cloned())
            .collect()
    }
}
