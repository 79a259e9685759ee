//! Hanashi CLI client.
//!
//! Keeps a roster of users merged with live presence and unread counters,
//! shows typing indicators, and reconnects after a dropped connection.

pub mod deferred;
pub mod domain;
pub mod error;
mod formatter;
pub mod roster;
mod roster_api;
mod runner;
mod session;
pub mod typing;
mod ui;

pub use runner::{ClientConfig, run_client};
