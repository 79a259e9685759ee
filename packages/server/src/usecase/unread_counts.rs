//! UseCase: unread counters
//!
//! - `mark_as_read`: the recipient opened the conversation; reset and confirm
//! - `initial_counts`: a (re)connected client asks for every non-zero counter
//! - `snapshot`: read-only view for the HTTP API
//!
//! Resets and initial counts are pushed under the unread gate shared with
//! `SendMessageUseCase`, so a count pushed by a concurrent message never
//! overtakes a newer reset.

use std::sync::Arc;

use crate::domain::{
    Connection, MessagePusher, Notification, UnreadCounter, UnreadCounterRepository, UserId,
};

use super::{error::MarkAsReadError, gate::NotificationGate};

pub struct UnreadCountsUseCase {
    unread_counters: Arc<dyn UnreadCounterRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    unread_gate: NotificationGate,
}

impl UnreadCountsUseCase {
    pub fn new(
        unread_counters: Arc<dyn UnreadCounterRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        unread_gate: NotificationGate,
    ) -> Self {
        Self {
            unread_counters,
            message_pusher,
            unread_gate,
        }
    }

    /// Reset the counter `sender_id → recipient_id`.
    ///
    /// Only the recipient may do this. Returns whether a non-zero counter was
    /// cleared; the zero count is pushed back only in that case, so repeating
    /// the request is a no-op.
    pub async fn mark_as_read(
        &self,
        requester: &Connection,
        sender_id: &str,
        recipient_id: &str,
    ) -> Result<bool, MarkAsReadError> {
        let sender_id = UserId::new(sender_id.to_string())?;
        let recipient_id = UserId::new(recipient_id.to_string())?;
        if requester.user_id() != &recipient_id {
            return Err(MarkAsReadError::NotRecipient {
                requester: requester.user_id().as_str().to_string(),
                recipient: recipient_id.into_string(),
            });
        }

        let _unread = self.unread_gate.enter().await;
        let cleared = self.unread_counters.reset(&sender_id, &recipient_id).await;
        if !cleared {
            return Ok(false);
        }

        tracing::debug!("'{}' read messages from '{}'", recipient_id, sender_id);
        let update = Notification::UnreadCount(UnreadCounter {
            sender_id,
            recipient_id,
            count: 0,
        });
        if let Err(e) = self.message_pusher.push_to(requester, &update).await {
            tracing::warn!(
                "Failed to confirm read state to '{}': {}",
                requester.user_id(),
                e
            );
        }
        Ok(true)
    }

    /// Push every non-zero counter addressed to `requester`, one event each.
    pub async fn initial_counts(&self, requester: &Connection) -> Vec<UnreadCounter> {
        let _unread = self.unread_gate.enter().await;
        let counters = self.unread_counters.snapshot(requester.user_id()).await;
        for counter in &counters {
            let update = Notification::UnreadCount(counter.clone());
            if let Err(e) = self.message_pusher.push_to(requester, &update).await {
                tracing::warn!(
                    "Failed to push initial unread counts to '{}': {}",
                    requester.user_id(),
                    e
                );
                break;
            }
        }
        counters
    }

    pub async fn snapshot(&self, recipient_id: &UserId) -> Vec<UnreadCounter> {
        self.unread_counters.snapshot(recipient_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockMessagePusher, ValueObjectError},
        infrastructure::{
            dto::websocket::{ServerEvent, UnreadCountPayload},
            message_pusher::WebSocketMessagePusher,
            repository::InMemoryUnreadCounterRepository,
        },
        usecase::test_support::{connection, drain_events, user},
    };

    fn unread(sender: &str, count: u32) -> ServerEvent {
        ServerEvent::UnreadCountUpdated(UnreadCountPayload {
            sender_id: sender.to_string(),
            unread_count: count,
        })
    }

    #[tokio::test]
    async fn test_mark_as_read_is_idempotent() {
        // テスト項目: 既読化は 1 回目だけ 0 を push し、2 回目は何もしない
        // given (前提条件):
        let counters = Arc::new(InMemoryUnreadCounterRepository::new());
        counters.increment(&user("u1"), &user("u2")).await;
        counters.increment(&user("u1"), &user("u2")).await;
        let usecase = UnreadCountsUseCase::new(
            counters.clone(),
            Arc::new(WebSocketMessagePusher::new()),
            NotificationGate::new(),
        );
        let (u2, mut rx2) = connection("u2", 2);

        // when (操作):
        let first = usecase.mark_as_read(&u2, "u1", "u2").await.unwrap();
        let second = usecase.mark_as_read(&u2, "u1", "u2").await.unwrap();

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(counters.get(&user("u1"), &user("u2")).await, 0);
        assert_eq!(drain_events(&mut rx2), vec![unread("u1", 0)]);
    }

    #[tokio::test]
    async fn test_only_recipient_can_mark_as_read() {
        // テスト項目: 受信者以外は既読化できず、カウンターは変わらない
        // given (前提条件):
        let counters = Arc::new(InMemoryUnreadCounterRepository::new());
        counters.increment(&user("u1"), &user("u2")).await;
        let mut pusher = MockMessagePusher::new();
        pusher.expect_push_to().never();
        let usecase =
            UnreadCountsUseCase::new(counters.clone(), Arc::new(pusher), NotificationGate::new());
        let (u1, _rx1) = connection("u1", 1);

        // when (操作):
        let result = usecase.mark_as_read(&u1, "u1", "u2").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MarkAsReadError::NotRecipient {
                requester: "u1".to_string(),
                recipient: "u2".to_string(),
            })
        );
        assert_eq!(counters.get(&user("u1"), &user("u2")).await, 1);
    }

    #[tokio::test]
    async fn test_mark_as_read_rejects_invalid_ids() {
        // テスト項目: 空のユーザー ID による既読化はエラーになる
        let usecase = UnreadCountsUseCase::new(
            Arc::new(InMemoryUnreadCounterRepository::new()),
            Arc::new(WebSocketMessagePusher::new()),
            NotificationGate::new(),
        );
        let (u2, _rx2) = connection("u2", 2);

        let result = usecase.mark_as_read(&u2, "", "u2").await;

        assert_eq!(
            result,
            Err(MarkAsReadError::InvalidUserId(ValueObjectError::EmptyUserId))
        );
    }

    #[tokio::test]
    async fn test_initial_counts_pushes_each_non_zero_counter() {
        // テスト項目: 初期未読数の要求に対して非ゼロのカウンターが送信者順に 1 件ずつ届く
        // given (前提条件):
        let counters = Arc::new(InMemoryUnreadCounterRepository::new());
        counters.increment(&user("u3"), &user("u2")).await;
        counters.increment(&user("u1"), &user("u2")).await;
        counters.increment(&user("u1"), &user("u2")).await;
        counters.increment(&user("u2"), &user("u1")).await;
        let usecase = UnreadCountsUseCase::new(
            counters.clone(),
            Arc::new(WebSocketMessagePusher::new()),
            NotificationGate::new(),
        );
        let (u2, mut rx2) = connection("u2", 2);

        // when (操作):
        let pushed = usecase.initial_counts(&u2).await;

        // then (期待する結果):
        assert_eq!(pushed.len(), 2);
        assert_eq!(
            drain_events(&mut rx2),
            vec![unread("u1", 2), unread("u3", 1)]
        );
    }

    #[tokio::test]
    async fn test_initial_counts_with_nothing_unread_pushes_nothing() {
        // テスト項目: 未読がなければ何も push しない
        let usecase = UnreadCountsUseCase::new(
            Arc::new(InMemoryUnreadCounterRepository::new()),
            Arc::new(WebSocketMessagePusher::new()),
            NotificationGate::new(),
        );
        let (u2, mut rx2) = connection("u2", 2);

        let pushed = usecase.initial_counts(&u2).await;

        assert!(pushed.is_empty());
        assert!(drain_events(&mut rx2).is_empty());
    }
}
