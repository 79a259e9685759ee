//! Infrastructure layer: wire DTOs, in-memory stores, and the WebSocket
//! message pusher.

pub mod dto;
pub mod message_pusher;
pub mod repository;
