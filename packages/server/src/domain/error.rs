//! Domain errors.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("user id '{0}' contains a forbidden character")]
    InvalidUserIdCharacter(String),

    #[error("user id is too long ({length} > {max})")]
    UserIdTooLong { length: usize, max: usize },

    #[error("room id '{0}' is not of the form '<user>_<user>'")]
    MalformedRoomId(String),

    #[error("room id '{0}' is not in canonical (sorted) order")]
    NonCanonicalRoomId(String),

    #[error("a room needs two distinct users, got '{0}' twice")]
    SelfRoom(String),

    #[error("message text must not be empty")]
    EmptyMessage,

    #[error("message text is too long ({length} > {max})")]
    MessageTooLong { length: usize, max: usize },

    #[error("display name is too long ({length} > {max})")]
    DisplayNameTooLong { length: usize, max: usize },
}

/// Errors raised while pushing a frame to a connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The connection's outbound channel has been closed (socket teardown)
    #[error("connection '{0}' is closed")]
    ConnectionClosed(String),

    /// The notification could not be encoded for the wire
    #[error("failed to encode notification: {0}")]
    Encode(String),
}
