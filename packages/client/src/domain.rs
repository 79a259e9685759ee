//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// A rejected handshake fails the same way on every retry.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Rejected(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}

/// Failed attempts so far, counting the one that just ended with `error`.
///
/// A session that connected and later dropped starts a new series, so
/// separate drops over a long run never add up to the limit.
pub fn next_attempt_count(error: &ClientError, current_attempt: u32) -> u32 {
    match error {
        ClientError::ConnectionLost(_) => 1,
        _ => current_attempt + 1,
    }
}

/// Room id of the conversation between two users (sorted ids joined by `_`).
pub fn room_id_between(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}_{}", a, b)
    } else {
        format!("{}_{}", b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_when_rejected() {
        // テスト項目: ハンドシェイクが拒否された場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::Rejected("a_b".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_not_reconnect_when_rejected() {
        // テスト項目: 拒否された場合、再接続すべきではないと判定される
        let error = ClientError::Rejected("a_b".to_string());

        assert!(!should_attempt_reconnect(&error, 0, 5));
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let first = should_attempt_reconnect(&error, 0, 5);
        let last = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(first);
        assert!(last);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        let error = ClientError::ConnectionError("network error".to_string());

        assert!(!should_attempt_reconnect(&error, 5, 5));
    }

    #[test]
    fn test_lost_session_starts_a_new_attempt_series() {
        // テスト項目: 接続済みのセッションが切れた場合、再接続の試行回数は 1 からやり直しになる
        // given (前提条件):
        let lost = ClientError::ConnectionLost("stream ended".to_string());

        // when (操作):
        let count = next_attempt_count(&lost, 4);

        // then (期待する結果):
        assert_eq!(count, 1);
        assert!(should_attempt_reconnect(&lost, count, 5));
    }

    #[test]
    fn test_failed_connect_adds_to_attempt_count() {
        // テスト項目: 接続できなかった場合は試行回数が積み上がる
        let error = ClientError::ConnectionError("refused".to_string());

        assert_eq!(next_attempt_count(&error, 0), 1);
        assert_eq!(next_attempt_count(&error, 4), 5);
        assert!(!should_attempt_reconnect(&error, 5, 5));
    }

    #[test]
    fn test_many_separate_drops_never_exhaust_attempts() {
        // テスト項目: 成功したセッションが何度切れても、再接続の上限には達しない
        // given (前提条件):
        let lost = ClientError::ConnectionLost("stream ended".to_string());
        let refused = ClientError::ConnectionError("refused".to_string());
        let mut count = 0;

        // when (操作): 1 回接続失敗してから繋がり、その後切れる、を 10 回繰り返す
        for _ in 0..10 {
            count = next_attempt_count(&refused, count);
            assert!(should_attempt_reconnect(&refused, count, 5));
            count = next_attempt_count(&lost, count);
            assert!(should_attempt_reconnect(&lost, count, 5));
        }

        // then (期待する結果):
        assert_eq!(count, 1);
    }

    #[test]
    fn test_room_id_is_symmetric() {
        // テスト項目: ルーム ID は引数の順序に依存しない
        assert_eq!(room_id_between("u2", "u1"), "u1_u2");
        assert_eq!(room_id_between("u1", "u2"), "u1_u2");
    }
}
