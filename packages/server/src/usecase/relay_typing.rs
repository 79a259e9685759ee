//! UseCase: relay typing state
//!
//! The server keeps no typing timers; it forwards the participant's state to
//! the other connections viewing the room. Expiry is the receiver's job.

use std::sync::Arc;

use crate::domain::{ChannelRegistry, Connection, MessagePusher, Notification};

use super::{error::RoomAccessError, room_access::authorize_room};

pub struct RelayTypingUseCase {
    registry: Arc<dyn ChannelRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayTypingUseCase {
    pub fn new(registry: Arc<dyn ChannelRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    pub async fn execute(
        &self,
        typist: &Connection,
        raw_room_id: &str,
        is_typing: bool,
    ) -> Result<(), RoomAccessError> {
        let (room_id, _) = authorize_room(typist.user_id(), raw_room_id)?;

        let targets: Vec<Connection> = self
            .registry
            .room_members(&room_id)
            .await
            .into_iter()
            .filter(|c| c.user_id() != typist.user_id())
            .collect();
        if targets.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            "'{}' typing={} in '{}'",
            typist.user_id(),
            is_typing,
            room_id
        );
        let notification = Notification::UserTyping {
            room_id,
            user_id: typist.user_id().clone(),
            is_typing,
        };
        self.message_pusher.broadcast(&targets, &notification).await;
        Ok(())
    }
}
