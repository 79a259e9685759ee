//! axum surface: router, WebSocket and HTTP handlers, shutdown signal.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
