//! Wire types of the bot backend's REST and WebSocket API.
//! Field names follow the backend's snake_case JSON.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::BotError;
use crate::indicators::candle::Candle;
use crate::indicators::config::StrategyConfig;
use crate::indicators::levels::{LevelSet, calculate_levels};
use crate::indicators::signals::Signal;

/// Side of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Per-symbol bot status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotStatus {
    pub symbol: String,
    pub running: bool,
    pub connected: bool,
    pub uptime: String,
    pub current_price: f64,
    pub position: String,
    pub pnl: f64,
    pub signal: String,
}

/// Status of every pair managed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatus {
    pub active_pairs: u32,
    pub total_pairs: u32,
    pub running_bots: u32,
    pub connected: bool,
    #[serde(default)]
    pub pairs: HashMap<String, BotStatus>,
}

/// Last price of a symbol. Also the payload of `price` stream messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTicker {
    pub symbol: String,
    pub price: f64,
    #[serde(default)]
    pub change_24h: f64,
}

/// A candle as served by `/api/candles`.
///
/// `time` is either an RFC 3339 / ISO 8601 date-time or Unix milliseconds.
/// Date-times without an offset are read as UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCandle {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl ApiCandle {
    /// Parses `time` into Unix milliseconds.
    pub fn timestamp_millis(&self) -> Result<u64, BotError> {
        parse_time_millis(&self.time)
    }
}

impl TryFrom<&ApiCandle> for Candle {
    type Error = BotError;

    fn try_from(api: &ApiCandle) -> Result<Self, Self::Error> {
        let timestamp = api.timestamp_millis()?;
        Ok(Candle::new(timestamp, api.open, api.high, api.low, api.close, api.volume))
    }
}

/// Converts a backend candle list into engine candles, preserving order.
pub fn to_candles(api_candles: &[ApiCandle]) -> Result<Vec<Candle>, BotError> {
    api_candles.iter().map(Candle::try_from).collect()
}

fn parse_time_millis(raw: &str) -> Result<u64, BotError> {
    let raw = raw.trim();
    let invalid = || BotError::InvalidTime(raw.to_string());

    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse::<u64>().map_err(|_| invalid());
    }

    let millis = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.timestamp_millis()
    } else {
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .ok_or_else(invalid)?
            .and_utc()
            .timestamp_millis()
    };

    u64::try_from(millis).map_err(|_| invalid())
}

/// Trade direction suggested by the backend's own signal evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalIndicators {
    pub ema_trend: String,
    pub magnetic_line: f64,
    pub ha_color: String,
}

/// Response of `/api/signal/{symbol}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub signal: SignalAction,
    pub strength: f64,
    pub indicators: SignalIndicators,
}

/// An open position with its backend-computed targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: Signal,
    pub entry_price: f64,
    pub current_price: f64,
    pub size: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
    pub tp4: f64,
    pub sl: f64,
    #[serde(default)]
    pub tp1_hit: bool,
    #[serde(default)]
    pub tp2_hit: bool,
    #[serde(default)]
    pub tp3_hit: bool,
    #[serde(default)]
    pub tp4_hit: bool,
}

impl Position {
    /// Exit levels for this position under `config`, computed locally.
    pub fn levels(&self, config: &StrategyConfig) -> LevelSet {
        calculate_levels(self.entry_price, self.side, config)
    }

    /// TP hit flags as reported by the backend.
    pub fn targets_hit(&self) -> [bool; 4] {
        [self.tp1_hit, self.tp2_hit, self.tp3_hit, self.tp4_hit]
    }
}

/// A filled order from the trade history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub symbol: String,
    pub side: TradeSide,
    pub price: f64,
    pub amount: f64,
    pub total: f64,
    pub time: String,
    #[serde(default)]
    pub pnl: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub total: f64,
    pub available: f64,
    pub in_positions: f64,
    pub daily_pnl: f64,
    pub daily_pnl_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub level: LogLevel,
    pub message: String,
    pub time: String,
}

/// Aggregate trading statistics from `/api/metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_trades: u64,
    pub winning_trades: u64,
    pub losing_trades: u64,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub average_pnl: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub daily_trades: u64,
    pub open_positions: u64,
}

/// Per-symbol execution settings held by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    pub tp1_percent: f64,
    pub tp2_percent: f64,
    pub tp3_percent: f64,
    pub tp4_percent: f64,
    pub sl_percent: f64,
    pub trailing_enabled: bool,
    pub trailing_percent: f64,
    pub leverage: f64,
    pub position_size: f64,
}

/// Partial update for `PUT /api/config/{symbol}`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp1_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp2_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp3_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp4_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_size: Option<f64>,
}

impl From<&StrategyConfig> for BotConfigUpdate {
    /// Carries the strategy's exit percentages over to the backend.
    fn from(config: &StrategyConfig) -> Self {
        Self {
            tp1_percent: Some(config.tp1_percent),
            tp2_percent: Some(config.tp2_percent),
            tp3_percent: Some(config.tp3_percent),
            tp4_percent: Some(config.tp4_percent),
            sl_percent: Some(config.sl_percent),
            trailing_percent: Some(config.trail_percent),
            ..Self::default()
        }
    }
}

/// Reply of start/stop commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// A message pushed on the `/ws/stream` feed: `{"type": ..., "data": ...}`.
///
/// Signal and status payloads are forwarded untyped; the backend does not pin
/// their shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum StreamMessage {
    Price(PriceTicker),
    Signal(serde_json::Value),
    Position(Position),
    Trade(Trade),
    Log(LogEntry),
    Status(serde_json::Value),
}

impl StreamMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            StreamMessage::Price(_) => "price",
            StreamMessage::Signal(_) => "signal",
            StreamMessage::Position(_) => "position",
            StreamMessage::Trade(_) => "trade",
            StreamMessage::Log(_) => "log",
            StreamMessage::Status(_) => "status",
        }
    }
}
