//! Conversion from domain notifications and entities to DTOs.

use crate::domain::{DeliveryStatus, Notification, UnreadCounter, UserId, UserProfile};
use crate::infrastructure::dto::{http, websocket as dto};

fn to_strings(ids: &[UserId]) -> Vec<String> {
    ids.iter().map(|id| id.as_str().to_string()).collect()
}

impl From<&Notification> for dto::ServerEvent {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::NewMessage(message) => Self::NewMessage(dto::NewMessagePayload {
                id: message.id.as_str().to_string(),
                room_id: message.room_id.as_str().to_string(),
                sender_id: message.sender_id.as_str().to_string(),
                text: message.text.as_str().to_string(),
                timestamp: message.created_at.value(),
                client_message_id: message.client_message_id.clone(),
            }),
            Notification::MessageAck {
                message_id,
                client_message_id,
                status,
            } => Self::MessageAck(dto::MessageAckPayload {
                id: message_id.as_str().to_string(),
                client_message_id: client_message_id.clone(),
                status: (*status).into(),
            }),
            Notification::UserTyping {
                room_id,
                user_id,
                is_typing,
            } => Self::UserTyping(dto::UserTypingPayload {
                room_id: room_id.as_str().to_string(),
                user_id: user_id.as_str().to_string(),
                is_typing: *is_typing,
            }),
            Notification::PresenceSnapshot(users) => {
                Self::OnlineUsersUpdated(dto::OnlineUsersPayload {
                    users: Some(to_strings(users)),
                    ..Default::default()
                })
            }
            Notification::PresenceChanged(change) => {
                let added = change.added();
                let removed = change.removed();
                Self::OnlineUsersUpdated(dto::OnlineUsersPayload {
                    users: None,
                    added: (!added.is_empty()).then(|| to_strings(&added)),
                    removed: (!removed.is_empty()).then(|| to_strings(&removed)),
                })
            }
            Notification::UnreadCount(counter) => Self::UnreadCountUpdated(counter.into()),
        }
    }
}

impl From<DeliveryStatus> for dto::DeliveryStatusDto {
    fn from(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Delivered => Self::Delivered,
            DeliveryStatus::Undelivered => Self::Undelivered,
        }
    }
}

impl From<&UnreadCounter> for dto::UnreadCountPayload {
    fn from(counter: &UnreadCounter) -> Self {
        Self {
            sender_id: counter.sender_id.as_str().to_string(),
            unread_count: counter.count,
        }
    }
}

impl From<UnreadCounter> for http::UnreadCountDto {
    fn from(counter: UnreadCounter) -> Self {
        Self {
            sender_id: counter.sender_id.into_string(),
            unread_count: counter.count,
        }
    }
}

impl From<UserProfile> for http::UserSummaryDto {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.user_id.into_string(),
            name: profile.name.as_str().to_string(),
            avatar: profile.avatar.as_deref().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChatMessage, MessageId, MessageText, PresenceChange, RoomId, Timestamp,
    };

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_new_message_notification_to_dto() {
        // テスト項目: NewMessage 通知が new-message イベントに変換される
        // given (前提条件):
        let message = ChatMessage {
            id: MessageId::new("m1".to_string()),
            room_id: RoomId::between(&user("u2"), &user("u1")).unwrap(),
            sender_id: user("u1"),
            text: MessageText::new("hi".to_string()).unwrap(),
            created_at: Timestamp::new(1000),
            client_message_id: Some("local-1".to_string()),
        };

        // when (操作):
        let event: dto::ServerEvent = (&Notification::NewMessage(message)).into();

        // then (期待する結果):
        assert_eq!(
            event,
            dto::ServerEvent::NewMessage(dto::NewMessagePayload {
                id: "m1".to_string(),
                room_id: "u1_u2".to_string(),
                sender_id: "u1".to_string(),
                text: "hi".to_string(),
                timestamp: 1000,
                client_message_id: Some("local-1".to_string()),
            })
        );
    }

    #[test]
    fn test_presence_changes_to_diff_dto() {
        // テスト項目: 接続・切断が added / removed の差分に変換される
        // given (前提条件):
        let connected = Notification::PresenceChanged(PresenceChange::Connected(user("u1")));
        let disconnected = Notification::PresenceChanged(PresenceChange::Disconnected(user("u1")));

        // when (操作):
        let connected: dto::ServerEvent = (&connected).into();
        let disconnected: dto::ServerEvent = (&disconnected).into();

        // then (期待する結果):
        assert_eq!(
            connected,
            dto::ServerEvent::OnlineUsersUpdated(dto::OnlineUsersPayload {
                added: Some(vec!["u1".to_string()]),
                ..Default::default()
            })
        );
        assert_eq!(
            disconnected,
            dto::ServerEvent::OnlineUsersUpdated(dto::OnlineUsersPayload {
                removed: Some(vec!["u1".to_string()]),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_presence_snapshot_to_full_set_dto() {
        // テスト項目: プレゼンスのスナップショットが users の全量に変換される
        // given (前提条件):
        let snapshot = Notification::PresenceSnapshot(vec![user("u1"), user("u2")]);

        // when (操作):
        let event: dto::ServerEvent = (&snapshot).into();

        // then (期待する結果):
        assert_eq!(
            event,
            dto::ServerEvent::OnlineUsersUpdated(dto::OnlineUsersPayload {
                users: Some(vec!["u1".to_string(), "u2".to_string()]),
                ..Default::default()
            })
        );
    }
}
