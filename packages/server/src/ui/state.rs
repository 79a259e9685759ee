//! Shared application state.

use std::sync::Arc;

use hanashi_shared::time::Clock;

use crate::{
    domain::{ChannelRegistry, MessagePusher, UnreadCounterRepository, UserDirectory},
    usecase::{
        ConnectUserUseCase, DisconnectUserUseCase, GetOnlineUsersUseCase, JoinRoomUseCase,
        ListUsersUseCase, NotificationGate, RelayTypingUseCase, SendMessageUseCase,
        UnreadCountsUseCase,
    },
};

/// Every use case a handler may call
pub struct AppState {
    pub connect_user_usecase: ConnectUserUseCase,
    pub disconnect_user_usecase: DisconnectUserUseCase,
    pub join_room_usecase: JoinRoomUseCase,
    pub send_message_usecase: SendMessageUseCase,
    pub relay_typing_usecase: RelayTypingUseCase,
    pub unread_counts_usecase: UnreadCountsUseCase,
    pub get_online_users_usecase: GetOnlineUsersUseCase,
    pub list_users_usecase: ListUsersUseCase,
}

impl AppState {
    /// Wire the use cases onto one set of stores and one pusher.
    ///
    /// Connect and disconnect share the presence gate; message routing and
    /// the unread use case share the unread gate.
    pub fn new(
        registry: Arc<dyn ChannelRegistry>,
        unread_counters: Arc<dyn UnreadCounterRepository>,
        directory: Arc<dyn UserDirectory>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let presence_gate = NotificationGate::new();
        let unread_gate = NotificationGate::new();

        Self {
            connect_user_usecase: ConnectUserUseCase::new(
                registry.clone(),
                directory.clone(),
                message_pusher.clone(),
                clock.clone(),
                presence_gate.clone(),
            ),
            disconnect_user_usecase: DisconnectUserUseCase::new(
                registry.clone(),
                message_pusher.clone(),
                presence_gate,
            ),
            join_room_usecase: JoinRoomUseCase::new(registry.clone()),
            send_message_usecase: SendMessageUseCase::new(
                registry.clone(),
                unread_counters.clone(),
                message_pusher.clone(),
                clock,
                unread_gate.clone(),
            ),
            relay_typing_usecase: RelayTypingUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            ),
            unread_counts_usecase: UnreadCountsUseCase::new(
                unread_counters,
                message_pusher,
                unread_gate,
            ),
            get_online_users_usecase: GetOnlineUsersUseCase::new(registry),
            list_users_usecase: ListUsersUseCase::new(directory),
        }
    }
}
