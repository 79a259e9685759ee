//! WebSocket wire protocol.
//!
//! Every frame is a JSON object tagged by `"type"` (kebab-case) with camelCase
//! fields. The client crate reuses these types, so both ends agree on the
//! format by construction.

use serde::{Deserialize, Serialize};

/// Events a client sends to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinRoom(JoinRoomPayload),
    LeaveRoom,
    SendMessage(SendMessagePayload),
    TypingStart(TypingPayload),
    TypingStop(TypingPayload),
    MarkAsRead(MarkAsReadPayload),
    RequestInitialUnreadCounts,
}

/// Events the server sends to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    NewMessage(NewMessagePayload),
    MessageAck(MessageAckPayload),
    UserTyping(UserTypingPayload),
    OnlineUsersUpdated(OnlineUsersPayload),
    UnreadCountUpdated(UnreadCountPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub room_id: String,
    pub message: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_message_id: Option<String>,
}

/// The only message type this server relays
pub const TEXT_MESSAGE_TYPE: &str = "text";

fn default_message_type() -> String {
    TEXT_MESSAGE_TYPE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAsReadPayload {
    pub sender_id: String,
    pub recipient_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessagePayload {
    pub id: String,
    pub room_id: String,
    pub sender_id: String,
    pub text: String,
    /// Server timestamp, Unix milliseconds
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_message_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatusDto {
    Delivered,
    Undelivered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAckPayload {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_message_id: Option<String>,
    pub status: DeliveryStatusDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypingPayload {
    pub room_id: String,
    pub user_id: String,
    pub is_typing: bool,
}

/// Either the full presence set (`users`) or a diff (`added` / `removed`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsersPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountPayload {
    pub sender_id: String,
    pub unread_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_message_with_defaults() {
        // テスト項目: messageType を省略した send-message は text として扱われる
        // given (前提条件):
        let json = r#"{"type":"send-message","roomId":"u1_u2","message":"hi"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::SendMessage(SendMessagePayload {
                room_id: "u1_u2".to_string(),
                message: "hi".to_string(),
                message_type: "text".to_string(),
                client_message_id: None,
            })
        );
    }

    #[test]
    fn test_parse_unit_events() {
        // テスト項目: ペイロードのないイベントをパースできる
        let request: ClientEvent =
            serde_json::from_str(r#"{"type":"request-initial-unread-counts"}"#).unwrap();
        let leave: ClientEvent = serde_json::from_str(r#"{"type":"leave-room"}"#).unwrap();

        assert_eq!(request, ClientEvent::RequestInitialUnreadCounts);
        assert_eq!(leave, ClientEvent::LeaveRoom);
    }

    #[test]
    fn test_parse_mark_as_read() {
        // テスト項目: mark-as-read の camelCase フィールドがパースされる
        // given (前提条件):
        let json = r#"{"type":"mark-as-read","senderId":"u1","recipientId":"u2"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::MarkAsRead(MarkAsReadPayload {
                sender_id: "u1".to_string(),
                recipient_id: "u2".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        // テスト項目: 未知のイベント種別はパースエラーになる
        let result = serde_json::from_str::<ClientEvent>(r#"{"type":"create-group"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_presence_diff_omits_absent_fields() {
        // テスト項目: プレゼンス差分は存在するフィールドだけが出力される
        // given (前提条件):
        let event = ServerEvent::OnlineUsersUpdated(OnlineUsersPayload {
            added: Some(vec!["u1".to_string()]),
            ..Default::default()
        });

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"type": "online-users-updated", "added": ["u1"]})
        );
    }

    #[test]
    fn test_serialize_new_message_wire_shape() {
        // テスト項目: new-message が camelCase のフィールド名で出力される
        // given (前提条件):
        let event = ServerEvent::NewMessage(NewMessagePayload {
            id: "m1".to_string(),
            room_id: "u1_u2".to_string(),
            sender_id: "u1".to_string(),
            text: "hi".to_string(),
            timestamp: 1000,
            client_message_id: None,
        });

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "type": "new-message",
                "id": "m1",
                "roomId": "u1_u2",
                "senderId": "u1",
                "text": "hi",
                "timestamp": 1000
            })
        );
    }
}
