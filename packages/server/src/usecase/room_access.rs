//! Room authorization shared by the room-scoped use cases.

use crate::domain::{RoomId, UserId};

use super::error::RoomAccessError;

/// Parse `raw_room_id` and check that `user_id` takes part in it.
///
/// Returns the room and the other participant.
pub fn authorize_room(user_id: &UserId, raw_room_id: &str) -> Result<(RoomId, UserId), RoomAccessError> {
    let room_id = RoomId::parse(raw_room_id)?;
    let peer = room_id
        .other_participant(user_id)
        .cloned()
        .ok_or_else(|| RoomAccessError::NotParticipant {
            user_id: user_id.as_str().to_string(),
            room_id: room_id.as_str().to_string(),
        })?;
    Ok((room_id, peer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValueObjectError;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_participant_is_authorized() {
        // テスト項目: 参加者はルームにアクセスでき、相手のユーザー ID が返る
        let (room_id, peer) = authorize_room(&user("u2"), "u1_u2").unwrap();

        assert_eq!(room_id.as_str(), "u1_u2");
        assert_eq!(peer, user("u1"));
    }

    #[test]
    fn test_outsider_is_rejected() {
        // テスト項目: 参加者でないユーザーは拒否される
        let result = authorize_room(&user("u3"), "u1_u2");

        assert_eq!(
            result,
            Err(RoomAccessError::NotParticipant {
                user_id: "u3".to_string(),
                room_id: "u1_u2".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_room_id_is_rejected() {
        // テスト項目: 空のルーム ID は不正な ID として拒否される
        let result = authorize_room(&user("u1"), "");

        assert_eq!(
            result,
            Err(RoomAccessError::InvalidRoom(ValueObjectError::MalformedRoomId(
                String::new()
            )))
        );
    }
}
