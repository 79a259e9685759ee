//! Store interfaces.
//!
//! The use cases depend on these traits only; `infrastructure` provides the
//! in-memory implementations. Each implementation serializes its own
//! mutations, so no caller ever needs to lock across two stores.

use async_trait::async_trait;

use super::{
    entity::{Connection, Registration, UnreadCounter, UserProfile},
    value_object::{ConnectionId, RoomId, UserId},
};

/// Who is reachable right now, and which room each connection is viewing.
#[async_trait]
pub trait ChannelRegistry: Send + Sync {
    /// Store `connection` for its user. A previous connection of the same
    /// user is replaced and handed back in [`Registration::replaced`].
    async fn register(&self, connection: Connection) -> Registration;

    /// Remove the user's mapping if it still points at `connection_id`.
    ///
    /// Returns the remaining connections when something was removed, `None`
    /// when the connection was already gone or had been replaced.
    async fn unregister(
        &self,
        user_id: &UserId,
        connection_id: ConnectionId,
    ) -> Option<Vec<Connection>>;

    async fn lookup(&self, user_id: &UserId) -> Option<Connection>;

    /// The presence set, sorted by user id
    async fn online_users(&self) -> Vec<UserId>;

    /// Make `room_id` the room this connection is viewing. Returns `false`
    /// when the connection is no longer the user's current one.
    async fn join_room(
        &self,
        user_id: &UserId,
        connection_id: ConnectionId,
        room_id: RoomId,
    ) -> bool;

    /// Stop viewing any room. Returns the room that was left.
    async fn leave_room(&self, user_id: &UserId, connection_id: ConnectionId) -> Option<RoomId>;

    /// Connections currently viewing `room_id`
    async fn room_members(&self, room_id: &RoomId) -> Vec<Connection>;
}

/// Per (sender, recipient) unread counters
#[async_trait]
pub trait UnreadCounterRepository: Send + Sync {
    /// Add one and return the new count (saturating)
    async fn increment(&self, sender_id: &UserId, recipient_id: &UserId) -> u32;

    /// Set the count to zero. Returns `false` if it already was zero.
    async fn reset(&self, sender_id: &UserId, recipient_id: &UserId) -> bool;

    /// Every non-zero counter addressed to `recipient_id`, sorted by sender
    async fn snapshot(&self, recipient_id: &UserId) -> Vec<UnreadCounter>;
}

/// Profiles of users seen by this process; stands in for the roster service
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn upsert(&self, profile: UserProfile);

    /// All known profiles, sorted by user id
    async fn list(&self) -> Vec<UserProfile>;
}
