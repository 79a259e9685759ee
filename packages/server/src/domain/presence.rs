//! Presence transitions.
//!
//! The presence set itself is the key set of the channel registry; this
//! module only names the two transitions the registry can produce.

use super::value_object::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceChange {
    Connected(UserId),
    Disconnected(UserId),
}

impl PresenceChange {
    pub fn user_id(&self) -> &UserId {
        match self {
            Self::Connected(user_id) | Self::Disconnected(user_id) => user_id,
        }
    }

    /// Users added to the presence set by this change
    pub fn added(&self) -> Vec<UserId> {
        match self {
            Self::Connected(user_id) => vec![user_id.clone()],
            Self::Disconnected(_) => Vec::new(),
        }
    }

    /// Users removed from the presence set by this change
    pub fn removed(&self) -> Vec<UserId> {
        match self {
            Self::Connected(_) => Vec::new(),
            Self::Disconnected(user_id) => vec![user_id.clone()],
        }
    }
}
