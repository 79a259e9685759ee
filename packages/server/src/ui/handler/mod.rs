//! Request handlers.

mod http;
mod websocket;

pub use http::{get_online_users, get_unread_counts, get_users, health_check};
pub use websocket::websocket_handler;
