//! UseCase layer: one struct per operation, wired with `Arc<dyn Trait>`
//! dependencies so tests can swap in mocks.

mod connect_user;
mod disconnect_user;
pub mod error;
mod gate;
mod join_room;
mod query;
mod relay_typing;
mod room_access;
mod send_message;
mod unread_counts;

#[cfg(test)]
mod test_support;

pub use connect_user::ConnectUserUseCase;
pub use disconnect_user::DisconnectUserUseCase;
pub use error::{JoinRoomError, MarkAsReadError, RoomAccessError, SendMessageError};
pub use gate::NotificationGate;
pub use join_room::JoinRoomUseCase;
pub use query::{GetOnlineUsersUseCase, ListUsersUseCase};
pub use relay_typing::RelayTypingUseCase;
pub use send_message::{SendMessageUseCase, SendOutcome};
pub use unread_counts::UnreadCountsUseCase;
