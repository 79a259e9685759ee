//! UseCase: close a channel
//!
//! Removes the connection from the registry and tells every remaining
//! connection that the user went away. Calling it for a connection that was
//! already removed, or replaced by a newer one, does nothing.

use std::sync::Arc;

use crate::domain::{ChannelRegistry, Connection, MessagePusher, Notification, PresenceChange};

use super::gate::NotificationGate;

pub struct DisconnectUserUseCase {
    registry: Arc<dyn ChannelRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    presence_gate: NotificationGate,
}

impl DisconnectUserUseCase {
    pub fn new(
        registry: Arc<dyn ChannelRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        presence_gate: NotificationGate,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            presence_gate,
        }
    }

    /// Returns `true` when the user actually went offline.
    pub async fn execute(&self, connection: &Connection) -> bool {
        let _presence = self.presence_gate.enter().await;
        let Some(remaining) = self
            .registry
            .unregister(connection.user_id(), connection.id)
            .await
        else {
            tracing::debug!(
                "Connection {} of '{}' was already gone",
                connection.id,
                connection.user_id()
            );
            return false;
        };

        let left = Notification::PresenceChanged(PresenceChange::Disconnected(
            connection.user_id().clone(),
        ));
        self.message_pusher.broadcast(&remaining, &left).await;
        true
    }
}
