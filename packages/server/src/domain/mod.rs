//! Domain layer: value objects, entities, and the interfaces the use cases
//! depend on.
//!
//! Nothing here knows about axum, WebSocket frames, or JSON.

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod notification;
pub mod presence;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Connection, Registration, UnreadCounter, UserProfile};
pub use error::{MessagePushError, ValueObjectError};
pub use factory::{ConnectionIdFactory, MessageIdFactory};
pub use message_pusher::{MessagePusher, OutboundFrame, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use notification::{DeliveryStatus, Notification};
pub use presence::PresenceChange;
pub use repository::{ChannelRegistry, UnreadCounterRepository, UserDirectory};
pub use value_object::{
    AvatarUrl, ConnectionId, DisplayName, MessageId, MessageText, RoomId, Timestamp, UserId,
};
