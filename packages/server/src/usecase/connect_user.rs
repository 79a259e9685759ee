//! UseCase: open a channel
//!
//! Records the profile for the roster, registers the connection (closing any
//! older connection of the same user), sends the new connection the full
//! presence set, then announces the user to everyone else.
//!
//! Registration and both presence pushes happen under the presence gate that
//! `DisconnectUserUseCase` also holds, so a concurrent disconnect is reported
//! either entirely before the snapshot or after the announcement.

use std::sync::Arc;

use hanashi_shared::time::Clock;

use crate::domain::{
    ChannelRegistry, Connection, ConnectionIdFactory, MessagePusher, Notification,
    PresenceChange, PusherChannel, Timestamp, UserDirectory, UserProfile,
};

use super::gate::NotificationGate;

pub struct ConnectUserUseCase {
    registry: Arc<dyn ChannelRegistry>,
    directory: Arc<dyn UserDirectory>,
    message_pusher: Arc<dyn MessagePusher>,
    connection_ids: ConnectionIdFactory,
    clock: Arc<dyn Clock>,
    presence_gate: NotificationGate,
}

impl ConnectUserUseCase {
    pub fn new(
        registry: Arc<dyn ChannelRegistry>,
        directory: Arc<dyn UserDirectory>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        presence_gate: NotificationGate,
    ) -> Self {
        Self {
            registry,
            directory,
            message_pusher,
            connection_ids: ConnectionIdFactory::new(),
            clock,
            presence_gate,
        }
    }

    /// Register a new connection for `profile`.
    ///
    /// Always succeeds. The returned `Connection` is the handle the caller
    /// uses for every later request and for `DisconnectUserUseCase`.
    pub async fn execute(&self, profile: UserProfile, channel: PusherChannel) -> Connection {
        let connection = Connection::new(
            self.connection_ids.generate(),
            profile,
            Timestamp::new(self.clock.now_millis()),
            channel,
        );

        self.directory.upsert(connection.profile.clone()).await;

        let _presence = self.presence_gate.enter().await;
        let registration = self.registry.register(connection.clone()).await;

        if let Some(replaced) = &registration.replaced {
            tracing::info!(
                "'{}' reconnected; closing previous connection {}",
                connection.user_id(),
                replaced.id
            );
            self.message_pusher.close(replaced).await;
        }

        if let Err(e) = self
            .message_pusher
            .push_to(
                &connection,
                &Notification::PresenceSnapshot(registration.online_users),
            )
            .await
        {
            tracing::warn!("Failed to send presence set to '{}': {}", connection.user_id(), e);
        }

        let joined = Notification::PresenceChanged(PresenceChange::Connected(
            connection.user_id().clone(),
        ));
        self.message_pusher
            .broadcast(&registration.others, &joined)
            .await;

        connection
    }
}
