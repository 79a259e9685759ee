//! Hanashi server library.
//!
//! Real-time direct messaging and presence over WebSocket: 1:1 rooms, typing
//! relay, an online-user set, and per-pair unread counters, all held in
//! process memory.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
