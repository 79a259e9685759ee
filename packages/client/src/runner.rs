//! Client execution logic with reconnection support.

use std::time::Duration;

use tokio::sync::mpsc;

use super::{
    domain::{next_attempt_count, should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    session::{SessionInputs, run_client_session},
    typing::{TYPING_WINDOW, TypingDebouncer},
    ui::spawn_line_reader,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Who to connect as, and where
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:8080/ws`
    pub url: String,
    /// HTTP API base, e.g. `http://127.0.0.1:8080`
    pub api_url: String,
}

/// Run the client with reconnection logic.
///
/// Every new session asks for the unread counters again and reloads the
/// roster, so badges after a reconnect match what a client that never
/// dropped would show.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let (typing_tx, typing_signals) = mpsc::unbounded_channel();
    let debouncer = TypingDebouncer::spawn(TYPING_WINDOW, typing_tx);
    let lines = spawn_line_reader(config.user_id.clone(), debouncer.draft_sink());
    let mut inputs = SessionInputs {
        lines,
        typing_signals,
        debouncer,
        open_peer: None,
    };

    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            config.url,
            config.user_id,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&config, &mut inputs).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                return Ok(());
            }
            Err(e) if should_exit_immediately(&e) => {
                tracing::error!("{}", e);
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("{}", e);
                reconnect_count = next_attempt_count(&e, reconnect_count);

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
