//! Hanashi direct-messaging server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hanashi-server
//! cargo run --bin hanashi-server -- --host 0.0.0.0 --port 3000
//! HANASHI_PORT=3000 cargo run --bin hanashi-server
//! ```

use std::sync::Arc;

use clap::Parser;
use hanashi_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryChannelRegistry, InMemoryUnreadCounterRepository, InMemoryUserDirectory},
    },
    ui::{AppState, Server},
};
use hanashi_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hanashi-server")]
#[command(about = "Direct-messaging and presence server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HANASHI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HANASHI_PORT", default_value = "8080")]
    port: u16,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "HANASHI_LOG_LEVEL", default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Stores
    // 2. MessagePusher
    // 3. UseCases (AppState)
    // 4. Server
    let registry = Arc::new(InMemoryChannelRegistry::new());
    let unread_counters = Arc::new(InMemoryUnreadCounterRepository::new());
    let directory = Arc::new(InMemoryUserDirectory::new());

    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    let state = AppState::new(
        registry,
        unread_counters,
        directory,
        message_pusher,
        Arc::new(SystemClock),
    );

    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
