//! Entities.

use super::{
    message_pusher::PusherChannel,
    value_object::{
        AvatarUrl, ConnectionId, DisplayName, MessageId, MessageText, RoomId, Timestamp, UserId,
    },
};

/// Display-safe subset of a user, passed in at connection time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub name: DisplayName,
    pub avatar: AvatarUrl,
}

impl UserProfile {
    pub fn new(user_id: UserId, name: DisplayName, avatar: AvatarUrl) -> Self {
        Self {
            user_id,
            name,
            avatar,
        }
    }
}

/// One live bidirectional channel.
///
/// Cloning a `Connection` clones the outbound handle, so callers can copy it
/// out of the registry and send without holding any lock.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub profile: UserProfile,
    pub connected_at: Timestamp,
    pub channel: PusherChannel,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        profile: UserProfile,
        connected_at: Timestamp,
        channel: PusherChannel,
    ) -> Self {
        Self {
            id,
            profile,
            connected_at,
            channel,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.profile.user_id
    }
}

/// Result of registering a connection
#[derive(Debug)]
pub struct Registration {
    /// The user's previous connection, which the caller must close
    pub replaced: Option<Connection>,
    /// Presence set after registration, sorted
    pub online_users: Vec<UserId>,
    /// Every other user's connection at the time of registration
    pub others: Vec<Connection>,
}

/// A stamped direct message. Ephemeral: delivered, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub text: MessageText,
    pub created_at: Timestamp,
    /// Client-chosen correlation id for optimistic UI; never used for identity
    pub client_message_id: Option<String>,
}

/// Number of messages from `sender_id` that `recipient_id` has not seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadCounter {
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub count: u32,
}
