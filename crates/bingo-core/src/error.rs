//! Error Types
//!
//! Every remote or decoding failure surfaces as a `BingoError`. Callers log
//! and swallow them; only the toggle path compensates.

use thiserror::Error;

/// Common result type for bingo operations
pub type BingoResult<T> = Result<T, BingoError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BingoError {
    /// The store answered with a non-success status
    #[error("remote error ({status}): {message}")]
    Remote { status: u16, message: String },
    /// The request never got an answer
    #[error("transport error: {0}")]
    Transport(String),
    /// The payload did not have the expected shape
    #[error("decode error: {0}")]
    Decode(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("subscription error: {0}")]
    Subscription(String),
}

impl From<serde_json::Error> for BingoError {
    fn from(e: serde_json::Error) -> Self {
        BingoError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for BingoError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => BingoError::Remote {
                status: status.as_u16(),
                message: e.to_string(),
            },
            None if e.is_decode() => BingoError::Decode(e.to_string()),
            None => BingoError::Transport(e.to_string()),
        }
    }
}
