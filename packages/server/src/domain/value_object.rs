//! Value objects.
//!
//! Every identifier that crosses the wire is validated here once, so the use
//! cases can rely on well-formed input.

use std::fmt;

use super::error::ValueObjectError;

/// Separator between the two user ids of a room id
pub const ROOM_ID_SEPARATOR: char = '_';

const USER_ID_MAX_LENGTH: usize = 64;
const MESSAGE_TEXT_MAX_LENGTH: usize = 4000;
const DISPLAY_NAME_MAX_LENGTH: usize = 64;

/// Stable user identifier, owned by the auth subsystem
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyUserId);
        }
        if value.chars().count() > USER_ID_MAX_LENGTH {
            return Err(ValueObjectError::UserIdTooLong {
                length: value.chars().count(),
                max: USER_ID_MAX_LENGTH,
            });
        }
        // The separator would make room ids ambiguous.
        if value
            .chars()
            .any(|c| c == ROOM_ID_SEPARATOR || c.is_whitespace() || c.is_control())
        {
            return Err(ValueObjectError::InvalidUserIdCharacter(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical identifier of a 1:1 conversation.
///
/// `RoomId::between(a, b) == RoomId::between(b, a)`, so both participants can
/// compute it locally without a handshake.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId {
    value: String,
    low: UserId,
    high: UserId,
}

impl RoomId {
    /// Derive the room id of the conversation between two users.
    pub fn between(a: &UserId, b: &UserId) -> Result<Self, ValueObjectError> {
        if a == b {
            return Err(ValueObjectError::SelfRoom(a.as_str().to_string()));
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Ok(Self {
            value: format!("{}{}{}", low.as_str(), ROOM_ID_SEPARATOR, high.as_str()),
            low: low.clone(),
            high: high.clone(),
        })
    }

    /// Parse a room id received from a client.
    pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
        let (low, high) = value
            .split_once(ROOM_ID_SEPARATOR)
            .ok_or_else(|| ValueObjectError::MalformedRoomId(value.to_string()))?;
        let low = UserId::try_from(low)
            .map_err(|_| ValueObjectError::MalformedRoomId(value.to_string()))?;
        let high = UserId::try_from(high)
            .map_err(|_| ValueObjectError::MalformedRoomId(value.to_string()))?;

        let room = Self::between(&low, &high)?;
        if room.value != value {
            return Err(ValueObjectError::NonCanonicalRoomId(value.to_string()));
        }
        Ok(room)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Both participants, in canonical order
    pub fn participants(&self) -> (&UserId, &UserId) {
        (&self.low, &self.high)
    }

    pub fn has_participant(&self, user_id: &UserId) -> bool {
        &self.low == user_id || &self.high == user_id
    }

    /// The peer of `user_id` in this room, or `None` if `user_id` is not a
    /// participant.
    pub fn other_participant(&self, user_id: &UserId) -> Option<&UserId> {
        if &self.low == user_id {
            Some(&self.high)
        } else if &self.high == user_id {
            Some(&self.low)
        } else {
            None
        }
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Server-assigned message identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Identifier of one live channel; distinguishes a user's replaced connection
/// from its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Message body, never empty or whitespace-only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyMessage);
        }
        let length = value.chars().count();
        if length > MESSAGE_TEXT_MAX_LENGTH {
            return Err(ValueObjectError::MessageTooLong {
                length,
                max: MESSAGE_TEXT_MAX_LENGTH,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name shown to peers. Falls back to the user id when blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let length = value.chars().count();
        if length > DISPLAY_NAME_MAX_LENGTH {
            return Err(ValueObjectError::DisplayNameTooLong {
                length,
                max: DISPLAY_NAME_MAX_LENGTH,
            });
        }
        Ok(Self(value.trim().to_string()))
    }

    pub fn or_user_id(value: Option<String>, user_id: &UserId) -> Result<Self, ValueObjectError> {
        match value {
            Some(name) if !name.trim().is_empty() => Self::new(name),
            _ => Ok(Self(user_id.as_str().to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Avatar URL as supplied by the profile subsystem; not dereferenced here
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AvatarUrl(Option<String>);

impl AvatarUrl {
    pub fn new(value: Option<String>) -> Self {
        Self(value.filter(|v| !v.trim().is_empty()))
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
