//! Error types for the Hanashi client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the handshake (invalid user id or profile)
    #[error("Server rejected the connection for '{0}'")]
    Rejected(String),

    /// The connection could not be opened
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established session dropped
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// The roster endpoint could not be read
    #[error("Failed to load roster: {0}")]
    Roster(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Roster(e.to_string())
    }
}
