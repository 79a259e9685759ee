//! In-memory user directory, filled from connection-time profiles.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{UserDirectory, UserId, UserProfile};

#[derive(Default)]
pub struct InMemoryUserDirectory {
    profiles: RwLock<BTreeMap<UserId, UserProfile>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn upsert(&self, profile: UserProfile) {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.user_id.clone(), profile);
    }

    async fn list(&self) -> Vec<UserProfile> {
        self.profiles.read().await.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AvatarUrl, DisplayName};

    fn profile(id: &str, name: &str) -> UserProfile {
        let user_id = UserId::new(id.to_string()).unwrap();
        UserProfile::new(
            user_id,
            DisplayName::new(name.to_string()).unwrap(),
            AvatarUrl::default(),
        )
    }

    #[tokio::test]
    async fn test_upsert_keeps_latest_profile_sorted_by_id() {
        // テスト項目: 同じユーザーは最新のプロフィールで上書きされ、ID 順に並ぶ
        // given (前提条件):
        let directory = InMemoryUserDirectory::new();
        directory.upsert(profile("u2", "Bob")).await;
        directory.upsert(profile("u1", "Alice")).await;

        // when (操作):
        directory.upsert(profile("u2", "Robert")).await;
        let profiles = directory.list().await;

        // then (期待する結果):
        let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Robert"]);
    }
}
