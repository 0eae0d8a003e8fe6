//! MessageParser trait for feed-specific message handling.

// WebSocketClient owns the connection, tasks and channel; a parser only knows
// the endpoint and how to turn one text frame into a typed message.

/// Trait for feed-specific message parsing.
pub trait MessageParser: Send + Sync + 'static {
    /// Typed message produced from a text frame.
    type Message: Send + 'static;

    /// Returns the WebSocket endpoint URL.
    fn endpoint(&self) -> &str;

    /// Parses one text frame.
    /// Returns None for frames that carry nothing for the consumer.
    fn parse_message(&self, msg: &str) -> Option<Self::Message>;

    fn name(&self) -> &'static str;
}
