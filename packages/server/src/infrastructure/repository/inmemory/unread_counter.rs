//! In-memory unread counter store.
//!
//! Increments are read-modify-write, so every operation takes the same lock;
//! operations on one (sender, recipient) pair are applied in arrival order.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{UnreadCounter, UnreadCounterRepository, UserId};

#[derive(Default)]
pub struct InMemoryUnreadCounterRepository {
    /// Key: (sender, recipient). Zero counters are removed.
    counters: Mutex<HashMap<(UserId, UserId), u32>>,
}

impl InMemoryUnreadCounterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn get(&self, sender_id: &UserId, recipient_id: &UserId) -> u32 {
        let counters = self.counters.lock().await;
        counters
            .get(&(sender_id.clone(), recipient_id.clone()))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl UnreadCounterRepository for InMemoryUnreadCounterRepository {
    async fn increment(&self, sender_id: &UserId, recipient_id: &UserId) -> u32 {
        let mut counters = self.counters.lock().await;
        let count = counters
            .entry((sender_id.clone(), recipient_id.clone()))
            .or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    async fn reset(&self, sender_id: &UserId, recipient_id: &UserId) -> bool {
        let mut counters = self.counters.lock().await;
        counters
            .remove(&(sender_id.clone(), recipient_id.clone()))
            .is_some_and(|count| count > 0)
    }

    async fn snapshot(&self, recipient_id: &UserId) -> Vec<UnreadCounter> {
        let counters = self.counters.lock().await;
        let mut snapshot: Vec<UnreadCounter> = counters
            .iter()
            .filter(|((_, recipient), count)| recipient == recipient_id && **count > 0)
            .map(|((sender, recipient), count)| UnreadCounter {
                sender_id: sender.clone(),
                recipient_id: recipient.clone(),
                count: *count,
            })
            .collect();
        snapshot.sort_by(|a, b| a.sender_id.cmp(&b.sender_id));
        snapshot
    }
}
