//! UseCase errors.

use thiserror::Error;

use crate::domain::ValueObjectError;

/// A room id from the client is unusable for this user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomAccessError {
    #[error("invalid room id: {0}")]
    InvalidRoom(#[from] ValueObjectError),

    #[error("'{user_id}' is not a participant of room '{room_id}'")]
    NotParticipant { user_id: String, room_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error(transparent)]
    Room(#[from] RoomAccessError),

    /// The connection was replaced by a newer one of the same user
    #[error("connection is no longer the user's active connection")]
    ConnectionReplaced,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error(transparent)]
    Room(#[from] RoomAccessError),

    #[error("invalid message text: {0}")]
    InvalidText(ValueObjectError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkAsReadError {
    #[error("invalid user id: {0}")]
    InvalidUserId(#[from] ValueObjectError),

    /// Only the recipient may reset its own counter
    #[error("'{requester}' cannot mark messages addressed to '{recipient}' as read")]
    NotRecipient { requester: String, recipient: String },
}
