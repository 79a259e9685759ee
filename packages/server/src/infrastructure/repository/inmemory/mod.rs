//! In-memory stores. One authoritative process holds all connection,
//! presence, and counter state.

pub mod channel_registry;
pub mod unread_counter;
pub mod user_directory;

pub use channel_registry::InMemoryChannelRegistry;
pub use unread_counter::InMemoryUnreadCounterRepository;
pub use user_directory::InMemoryUserDirectory;
