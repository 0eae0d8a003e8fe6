//! Parser for the bot backend's `/ws/stream` push feed.

use tracing::warn;

use crate::bot::message_parser::MessageParser;
use crate::bot::types::StreamMessage;
use crate::bot::websocket_client::WebSocketClient;

/// Decodes `{"type": ..., "data": ...}` frames into `StreamMessage`.
#[derive(Debug, Clone)]
pub struct BotStreamParser {
    endpoint: String,
}

impl BotStreamParser {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl MessageParser for BotStreamParser {
    type Message = StreamMessage;

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn name(&self) -> &'static str {
        "bot-stream"
    }

    fn parse_message(&self, msg: &str) -> Option<StreamMessage> {
        match serde_json::from_str(msg) {
            Ok(message) => Some(message),
            Err(e) => {
                // Unknown message types land here too
                warn!(error = %e, "Dropping unparseable stream message");
                None
            }
        }
    }
}

pub type BotStreamClient = WebSocketClient<BotStreamParser>;

pub fn new_bot_stream_client(endpoint: impl Into<String>) -> BotStreamClient {
    WebSocketClient::new(BotStreamParser::new(endpoint))
}
