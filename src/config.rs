use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::BotError;
use crate::indicators::config::StrategyConfig;
use crate::indicators::timeframe::Timeframe;

/// Monitor configuration, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the bot's REST API.
    pub api_url: String,
    /// URL of the bot's WebSocket push feed.
    pub ws_url: String,
    /// Symbol to watch, as the backend names it (e.g. `BTC/USDT`).
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Number of candles requested and kept in memory.
    pub candle_limit: usize,
    pub heikin_ashi: bool,
    /// How often the candle window is refreshed over REST.
    pub candle_refresh: Duration,
    /// Pause before reopening the push feed after it closes.
    pub stream_reconnect_delay: Duration,
    /// Optional JSON file with `StrategyConfig` overrides.
    pub strategy_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            ws_url: "ws://localhost:5000/ws/stream".to_string(),
            symbol: "BTC/USDT".to_string(),
            timeframe: Timeframe::M15,
            candle_limit: 100,
            heikin_ashi: false,
            candle_refresh: Duration::from_secs(15),
            stream_reconnect_delay: Duration::from_secs(3),
            strategy_path: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeframe = match lookup("BOT_TIMEFRAME") {
            Some(raw) => raw.parse().map_err(BotError::Config)?,
            None => defaults.timeframe,
        };

        let candle_limit =
            parse_var(&lookup, "BOT_CANDLE_LIMIT")?.unwrap_or(defaults.candle_limit);
        if candle_limit == 0 {
            return Err(BotError::Config("BOT_CANDLE_LIMIT must be at least 1".to_string()));
        }

        let candle_refresh = parse_var::<u64, _>(&lookup, "BOT_CANDLE_REFRESH_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.candle_refresh);

        let stream_reconnect_delay = parse_var::<u64, _>(&lookup, "BOT_WS_RECONNECT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.stream_reconnect_delay);

        Ok(Self {
            api_url: lookup("BOT_API_URL").unwrap_or(defaults.api_url),
            ws_url: lookup("BOT_WS_URL").unwrap_or(defaults.ws_url),
            symbol: lookup("BOT_SYMBOL").unwrap_or(defaults.symbol),
            timeframe,
            candle_limit,
            heikin_ashi: parse_var(&lookup, "BOT_HEIKIN_ASHI")?
                .unwrap_or(defaults.heikin_ashi),
            candle_refresh,
            stream_reconnect_delay,
            strategy_path: lookup("STRATEGY_CONFIG_PATH").map(PathBuf::from),
        })
    }

    /// Reads the strategy overrides file, or returns the defaults when none is set.
    pub fn load_strategy(&self) -> Result<StrategyConfig, BotError> {
        let Some(path) = &self.strategy_path else {
            return Ok(StrategyConfig::default());
        };

        let raw = fs::read_to_string(path)
            .map_err(|e| BotError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, BotError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| {
                    BotError::Config(format!("{} has invalid value '{}': {}", key, raw, e))
                })
        })
        .transpose()
}
