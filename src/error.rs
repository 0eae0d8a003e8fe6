use thiserror::Error;

/// Errors raised by the bot I/O layer and configuration loading.
///
/// The indicator engine itself has no failure modes and never returns these.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Stream client is not connected")]
    NotConnected,

    #[error("Stream channel closed")]
    ChannelClosed,

    #[error("Invalid candle time '{0}'")]
    InvalidTime(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
