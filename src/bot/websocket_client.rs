//! Generic WebSocket client for push feeds.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::bot::message_parser::MessageParser;
use crate::error::{BotError, Result};

const OUTGOING_BUFFER: usize = 100;
const INCOMING_BUFFER: usize = 1000;

// WebSocketClient<P: MessageParser> keeps the connection plumbing (tasks,
// channels, connection state) while P decides what a frame means.

/// Generic WebSocket client. Feed-specific logic lives in the MessageParser.
pub struct WebSocketClient<P: MessageParser> {
    parser: Arc<P>,
    connected_at: Option<Instant>,
    // Cleared by the read task when the server goes away
    connected: Arc<AtomicBool>,
    ws_sender: Option<mpsc::Sender<String>>,
    reader: Option<JoinHandle<()>>,
}

impl<P: MessageParser> WebSocketClient<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser: Arc::new(parser),
            connected_at: None,
            connected: Arc::new(AtomicBool::new(false)),
            ws_sender: None,
            reader: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.parser.name()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Time since the current connection was opened.
    pub fn connected_for(&self) -> Option<std::time::Duration> {
        self.connected_at
            .filter(|_| self.is_connected())
            .map(|at| at.elapsed())
    }

    /// Connects to the parser's endpoint and spawns the read and write tasks.
    /// Returns the receiver on which parsed messages are delivered.
    ///
    /// The receiver yields `None` once the connection ends.
    pub async fn connect(&mut self) -> Result<mpsc::Receiver<P::Message>> {
        if self.ws_sender.is_some() {
            self.disconnect().await;
        }

        let endpoint = self.parser.endpoint();
        info!(feed = self.parser.name(), endpoint, "Connecting");

        let (ws_stream, _response) = connect_async(endpoint).await?;
        let (mut write, mut read) = ws_stream.split();

        // Messages TO the WebSocket
        let (ws_tx, mut ws_rx) = mpsc::channel::<String>(OUTGOING_BUFFER);
        // Parsed messages FROM the WebSocket
        let (message_tx, message_rx) = mpsc::channel::<P::Message>(INCOMING_BUFFER);

        self.ws_sender = Some(ws_tx);
        self.connected.store(true, Ordering::Release);
        self.connected_at = Some(Instant::now());

        let name = self.parser.name();

        // Task: handle outgoing messages. Ends when the client drops its sender.
        tokio::spawn(async move {
            while let Some(msg) = ws_rx.recv().await {
                if let Err(e) = write.send(Message::Text(msg.into())).await {
                    error!(feed = name, error = %e, "Failed to send WebSocket message");
                    break;
                }
            }
            let _ = write.close().await;
            debug!(feed = name, "Write task ended");
        });

        // Task: handle incoming messages
        let parser = Arc::clone(&self.parser);
        let connected = Arc::clone(&self.connected);
        self.reader = Some(tokio::spawn(async move {
            while let Some(msg_result) = read.next().await {
                match msg_result {
                    Ok(Message::Text(text)) => {
                        if let Some(message) = parser.parse_message(text.as_str()) {
                            if message_tx.send(message).await.is_err() {
                                debug!(feed = name, "Consumer dropped, stopping read task");
                                break;
                            }
                        }
                    }
                    Ok(Message::Ping(_)) => {
                        // Pong handled automatically by tungstenite
                        debug!(feed = name, "Ping received");
                    }
                    Ok(Message::Close(frame)) => {
                        info!(feed = name, ?frame, "Connection closed by server");
                        break;
                    }
                    Ok(_) => {
                        // Binary, pong and raw frames carry nothing for us
                    }
                    Err(e) => {
                        warn!(feed = name, error = %e, "WebSocket error");
                        break;
                    }
                }
            }
            connected.store(false, Ordering::Release);
            debug!(feed = name, "Read task ended");
        }));

        info!(feed = name, "Connected");
        Ok(message_rx)
    }

    /// Sends a raw text frame to the server.
    pub async fn send(&self, text: impl Into<String>) -> Result<()> {
        if !self.is_connected() {
            return Err(BotError::NotConnected);
        }

        let sender = self.ws_sender.as_ref().ok_or(BotError::NotConnected)?;
        sender
            .send(text.into())
            .await
            .map_err(|_| BotError::ChannelClosed)
    }

    /// Closes the connection. Pending messages already in the receiver stay readable.
    pub async fn disconnect(&mut self) {
        // Dropping the sender ends the write task, which closes the socket
        self.ws_sender = None;
        if let Some(reader) = self.reader.take() {
            reader.abort();
            let _ = reader.await;
        }
        self.connected.store(false, Ordering::Release);
        self.connected_at = None;
        info!(feed = self.parser.name(), "Disconnected");
    }

    /// Drops the current connection and opens a new one.
    /// Returns the receiver for the new connection.
    pub async fn reconnect(&mut self) -> Result<mpsc::Receiver<P::Message>> {
        info!(feed = self.parser.name(), "Reconnecting");
        self.disconnect().await;
        self.connect().await
    }
}

impl<P: MessageParser> Drop for WebSocketClient<P> {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}
