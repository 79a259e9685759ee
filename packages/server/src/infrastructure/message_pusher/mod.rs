//! `MessagePusher` implementations.
//!
//! - `websocket`: queues JSON text frames onto each connection's channel

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
