//! Store implementations.

pub mod inmemory;

pub use inmemory::{InMemoryChannelRegistry, InMemoryUnreadCounterRepository, InMemoryUserDirectory};
