//! Outbound delivery interface.
//!
//! The UI layer creates the per-connection channel; implementations of
//! [`MessagePusher`] encode notifications and write them to it.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    entity::Connection, error::MessagePushError, notification::Notification, value_object::UserId,
};

/// Frame queued for one connection's writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Encoded server event
    Text(String),
    /// Close the socket (the connection was replaced)
    Close,
}

/// Outbound half of a connection. One writer task drains it, so frames reach
/// the socket in the order they were queued.
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Queue a notification for a single connection.
    async fn push_to(
        &self,
        connection: &Connection,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// Queue a notification for every target. Failures do not stop the
    /// fan-out; the users whose push failed are returned.
    async fn broadcast(&self, targets: &[Connection], notification: &Notification) -> Vec<UserId>;

    /// Ask the connection's writer to close the socket.
    async fn close(&self, connection: &Connection);
}
