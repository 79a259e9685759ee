//! Server-to-client notifications, independent of the wire format.

use super::{
    entity::{ChatMessage, UnreadCounter},
    presence::PresenceChange,
    value_object::{MessageId, RoomId, UserId},
};

/// Whether a message reached the recipient's open conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    Undelivered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    NewMessage(ChatMessage),
    /// Sent to the author only
    MessageAck {
        message_id: MessageId,
        client_message_id: Option<String>,
        status: DeliveryStatus,
    },
    UserTyping {
        room_id: RoomId,
        user_id: UserId,
        is_typing: bool,
    },
    /// Full presence set, sent to a connection right after it registers
    PresenceSnapshot(Vec<UserId>),
    PresenceChanged(PresenceChange),
    UnreadCount(UnreadCounter),
}
