//! Hanashi CLI client.
//!
//! Connects to a Hanashi server as one user, shows who is online with unread
//! counts, and chats 1:1 with typing indicators. Reconnects automatically on
//! disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hanashi-client -- --user-id alice --name Alice
//! cargo run --bin hanashi-client -- -u bob
//! ```

use clap::Parser;

use hanashi_client::{ClientConfig, run_client};
use hanashi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hanashi-client")]
#[command(about = "Direct-messaging client with presence and unread counts", long_about = None)]
struct Args {
    /// User id to connect as (no '_', no whitespace)
    #[arg(short = 'u', long)]
    user_id: String,

    /// Display name shown to other users (defaults to the user id)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Avatar URL shown to other users
    #[arg(long)]
    avatar: Option<String>,

    /// WebSocket server URL
    #[arg(long, env = "HANASHI_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// HTTP API base URL, used to load the user list
    #[arg(long, env = "HANASHI_API_URL", default_value = "http://127.0.0.1:8080")]
    api_url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = ClientConfig {
        user_id: args.user_id,
        name: args.name,
        avatar: args.avatar,
        url: args.url,
        api_url: args.api_url,
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
