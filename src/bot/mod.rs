//! Connection to the external trading bot: REST API, push feed and the
//! candle window that feeds the indicator engine.

pub mod candle_feed;
pub mod message_parser;
pub mod rest_client;
pub mod stream;
pub mod types;
pub mod websocket_client;

// Re-exports for convenience
pub use candle_feed::CandleFeed;
pub use message_parser::MessageParser;
pub use rest_client::BotApiClient;
pub use stream::{BotStreamClient, BotStreamParser, new_bot_stream_client};
pub use types::{
    ActionResponse,
    ApiCandle,
    Balance,
    BotConfig,
    BotConfigUpdate,
    BotStatus,
    GlobalStatus,
    LogEntry,
    LogLevel,
    Metrics,
    Position,
    PriceTicker,
    SignalAction,
    SignalSnapshot,
    StreamMessage,
    Trade,
    TradeSide,
    to_candles,
};
pub use websocket_client::WebSocketClient;
