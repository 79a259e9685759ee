//! WebSocket-backed `MessagePusher`.
//!
//! The socket itself is owned by the UI layer (`ui::handler::websocket`),
//! which creates the connection's channel and runs the writer task. This
//! implementation encodes notifications as JSON and queues them on that
//! channel, so pushing never waits on the network.

use async_trait::async_trait;

use crate::{
    domain::{Connection, MessagePushError, MessagePusher, Notification, OutboundFrame, UserId},
    infrastructure::dto::websocket::ServerEvent,
};

#[derive(Debug, Default)]
pub struct WebSocketMessagePusher;

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self
    }

    fn encode(notification: &Notification) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(notification))
            .map_err(|e| MessagePushError::Encode(e.to_string()))
    }

    fn queue(connection: &Connection, frame: OutboundFrame) -> Result<(), MessagePushError> {
        connection.channel.send(frame).map_err(|_| {
            MessagePushError::ConnectionClosed(format!(
                "{}/{}",
                connection.user_id(),
                connection.id
            ))
        })
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn push_to(
        &self,
        connection: &Connection,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let json = Self::encode(notification)?;
        Self::queue(connection, OutboundFrame::Text(json))?;
        tracing::debug!("Pushed notification to '{}'", connection.user_id());
        Ok(())
    }

    async fn broadcast(&self, targets: &[Connection], notification: &Notification) -> Vec<UserId> {
        let json = match Self::encode(notification) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Dropping broadcast: {}", e);
                return targets.iter().map(|c| c.user_id().clone()).collect();
            }
        };

        let mut failed = Vec::new();
        for target in targets {
            // Partial failure is tolerated; the caller decides what a miss means.
            if let Err(e) = Self::queue(target, OutboundFrame::Text(json.clone())) {
                tracing::warn!("Failed to push to '{}': {}", target.user_id(), e);
                failed.push(target.user_id().clone());
            } else {
                tracing::debug!("Broadcasted notification to '{}'", target.user_id());
            }
        }
        failed
    }

    async fn close(&self, connection: &Connection) {
        if Self::queue(connection, OutboundFrame::Close).is_err() {
            tracing::debug!(
                "Connection {} of '{}' already closed",
                connection.id,
                connection.user_id()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AvatarUrl, ConnectionId, DisplayName, PresenceChange, Timestamp, UserProfile,
    };
    use tokio::sync::mpsc;

    fn create_connection(
        id: &str,
        connection_id: u64,
    ) -> (Connection, mpsc::UnboundedReceiver<OutboundFrame>) {
        let user_id = UserId::new(id.to_string()).unwrap();
        let profile = UserProfile::new(
            user_id.clone(),
            DisplayName::or_user_id(None, &user_id).unwrap(),
            AvatarUrl::default(),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Connection::new(
                ConnectionId::new(connection_id),
                profile,
                Timestamp::new(0),
                tx,
            ),
            rx,
        )
    }

    fn joined(id: &str) -> Notification {
        Notification::PresenceChanged(PresenceChange::Connected(
            UserId::new(id.to_string()).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_push_to_queues_json_frame() {
        // テスト項目: 特定の接続に JSON フレームがキューされる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (alice, mut rx) = create_connection("alice", 1);

        // when (操作):
        let result = pusher.push_to(&alice, &joined("bob")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.recv().await,
            Some(OutboundFrame::Text(
                r#"{"type":"online-users-updated","added":["bob"]}"#.to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_push_to_closed_connection_fails() {
        // テスト項目: 切断済みの接続への送信はエラーになる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (alice, rx) = create_connection("alice", 1);
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&alice, &joined("bob")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ConnectionClosed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_reports_partial_failure() {
        // テスト項目: 一部の接続が閉じていても残りには配信され、失敗したユーザーが返る
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (alice, mut alice_rx) = create_connection("alice", 1);
        let (bob, bob_rx) = create_connection("bob", 2);
        drop(bob_rx);

        // when (操作):
        let failed = pusher.broadcast(&[alice, bob], &joined("carol")).await;

        // then (期待する結果):
        assert_eq!(failed, vec![UserId::new("bob".to_string()).unwrap()]);
        assert!(matches!(alice_rx.recv().await, Some(OutboundFrame::Text(_))));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        let pusher = WebSocketMessagePusher::new();

        let failed = pusher.broadcast(&[], &joined("carol")).await;

        assert!(failed.is_empty());
    }

    #[tokio::test]
    async fn test_close_queues_close_frame() {
        // テスト項目: close で Close フレームがキューされる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (alice, mut rx) = create_connection("alice", 1);

        // when (操作):
        pusher.close(&alice).await;

        // then (期待する結果):
        assert_eq!(rx.recv().await, Some(OutboundFrame::Close));
    }
}
