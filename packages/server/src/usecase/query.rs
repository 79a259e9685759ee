//! UseCase: read-only queries for the HTTP API.

use std::sync::Arc;

use crate::domain::{ChannelRegistry, UserDirectory, UserId, UserProfile};

/// The presence set
pub struct GetOnlineUsersUseCase {
    registry: Arc<dyn ChannelRegistry>,
}

impl GetOnlineUsersUseCase {
    pub fn new(registry: Arc<dyn ChannelRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self) -> Vec<UserId> {
        self.registry.online_users().await
    }
}

/// Every user who has connected to this process, for the client roster
pub struct ListUsersUseCase {
    directory: Arc<dyn UserDirectory>,
}

impl ListUsersUseCase {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    pub async fn execute(&self) -> Vec<UserProfile> {
        self.directory.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::repository::{InMemoryChannelRegistry, InMemoryUserDirectory},
        usecase::test_support::{connection, profile, user},
    };

    #[tokio::test]
    async fn test_online_users_follow_registry() {
        // テスト項目: オンライン一覧はレジストリの登録状態を反映する
        // given (前提条件):
        let registry = Arc::new(InMemoryChannelRegistry::new());
        let usecase = GetOnlineUsersUseCase::new(registry.clone());
        let (u2, _rx2) = connection("u2", 2);
        let (u1, _rx1) = connection("u1", 1);
        registry.register(u2.clone()).await;
        registry.register(u1.clone()).await;

        // when (操作):
        registry.unregister(u2.user_id(), u2.id).await;
        let online = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(online, vec![user("u1")]);
    }

    #[tokio::test]
    async fn test_list_users_returns_known_profiles() {
        // テスト項目: 接続したことのあるユーザーのプロフィールが ID 順に返る
        let directory = Arc::new(InMemoryUserDirectory::new());
        directory.upsert(profile("u2")).await;
        directory.upsert(profile("u1")).await;
        let usecase = ListUsersUseCase::new(directory);

        let users = usecase.execute().await;

        assert_eq!(users, vec![profile("u1"), profile("u2")]);
    }
}
