//! UseCase: open and close a conversation view
//!
//! A connection views at most one room at a time. Whether the recipient is
//! viewing a room is what decides between live delivery and an unread count.

use std::sync::Arc;

use crate::domain::{ChannelRegistry, Connection, RoomId};

use super::{
    error::JoinRoomError,
    room_access::authorize_room,
};

pub struct JoinRoomUseCase {
    registry: Arc<dyn ChannelRegistry>,
}

impl JoinRoomUseCase {
    pub fn new(registry: Arc<dyn ChannelRegistry>) -> Self {
        Self { registry }
    }

    /// Subscribe `connection` to `raw_room_id`, leaving any previous room.
    pub async fn join(
        &self,
        connection: &Connection,
        raw_room_id: &str,
    ) -> Result<RoomId, JoinRoomError> {
        let (room_id, _peer) = authorize_room(connection.user_id(), raw_room_id)?;

        if !self
            .registry
            .join_room(connection.user_id(), connection.id, room_id.clone())
            .await
        {
            return Err(JoinRoomError::ConnectionReplaced);
        }
        tracing::info!("'{}' joined room '{}'", connection.user_id(), room_id);
        Ok(room_id)
    }

    /// Stop viewing the current room, if any.
    pub async fn leave(&self, connection: &Connection) -> Option<RoomId> {
        let left = self
            .registry
            .leave_room(connection.user_id(), connection.id)
            .await;
        if let Some(room_id) = &left {
            tracing::info!("'{}' left room '{}'", connection.user_id(), room_id);
        }
        left
    }
}
