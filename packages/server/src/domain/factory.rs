//! Identifier factories.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use super::value_object::{ConnectionId, MessageId};

/// Generates server-side message ids
pub struct MessageIdFactory;

impl MessageIdFactory {
    pub fn generate() -> MessageId {
        MessageId::new(Uuid::new_v4().to_string())
    }
}

/// Hands out process-unique connection ids
#[derive(Debug, Default)]
pub struct ConnectionIdFactory {
    next: AtomicU64,
}

impl ConnectionIdFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self) -> ConnectionId {
        ConnectionId::new(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_message_ids_are_unique() {
        // テスト項目: 生成されるメッセージ ID が重複しない
        // given (前提条件):
        let count = 1000;

        // when (操作):
        let ids: HashSet<String> = (0..count)
            .map(|_| MessageIdFactory::generate().into_string())
            .collect();

        // then (期待する結果):
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_connection_ids_increase() {
        // テスト項目: 接続 ID が 1 から順に払い出される
        // given (前提条件):
        let factory = ConnectionIdFactory::new();

        // when (操作):
        let first = factory.generate();
        let second = factory.generate();

        // then (期待する結果):
        assert_eq!(first.value(), 1);
        assert_eq!(second.value(), 2);
    }
}
